use wasm_bindgen::prelude::*;

mod course;
mod game;

use game::MinigolfGame;

golf_web::export_game!(MinigolfGame, "golf-3");
