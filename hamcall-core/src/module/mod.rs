pub mod grid;
pub mod history;
pub mod links;
pub mod lookup;
pub mod map;
pub mod presenter;
pub mod theme;
