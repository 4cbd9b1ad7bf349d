//! Chess game records, PGN extraction and move replay shared by the workspace.

pub mod game_data;
pub mod pgn;
pub mod replay;
