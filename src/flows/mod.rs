//! The two views of the application and the routes between them.

mod form;
mod table;

pub use form::*;
pub use table::*;

/// Loading indicator shown while answers are in flight.
pub const LOADER_ASSET: &str = "/loader.gif";
pub const LOADER_ALT: &str = "Loading...";

/// Navigation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Form,
    Table,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Form => "/form",
            Route::Table => "/table",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/form" => Some(Route::Form),
            "/table" => Some(Route::Table),
            _ => None,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
