mod session;

pub use session::ApiSession;
