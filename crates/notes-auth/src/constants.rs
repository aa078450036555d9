//! Notes API auth endpoints and header constants

/// API base URL used when nothing is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Form-encoded login (`username`, `password`), returns both tokens
pub const LOGIN_PATH: &str = "/api/auth/login";

/// Exchanges `?refresh_token=` for a new access token
pub const REFRESH_PATH: &str = "/api/auth/refresh";

/// Invalidates `?refresh_token=` server-side
pub const LOGOUT_PATH: &str = "/api/auth/logout";

/// Current user profile; also used to validate a stored access token
pub const ME_PATH: &str = "/api/auth/me";

/// Scheme prefix for the `Authorization` header
pub const BEARER_PREFIX: &str = "Bearer ";
