//! Root crate facade for the LimitPaste core and server crates.

pub use limitpaste_server::{
    clock, config, constants, create_app, db, error, handlers, models, resolve_bind_address,
    serve_router, sweeper, AppError, AppState, Clock, Config, Database, ExpiryClock, FixedClock,
    PasteService, SystemClock, DEFAULT_PORT,
};
