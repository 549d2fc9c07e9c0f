// Request middleware applied ahead of the route handlers.

pub mod rate_limit;
