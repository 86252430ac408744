//! Response finalization module
//!
//! Every response leaving the server passes through [`apply_fixed_headers`],
//! whatever its status. A page on another origin can then always fetch
//! fresh assets.

use hyper::header::{HeaderName, HeaderValue};
use hyper::Response;

/// Headers injected into every response, in emission order
pub const FIXED_HEADERS: [(&str, &str); 3] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET"),
    ("cache-control", "no-store, no-cache, must-revalidate"),
];

/// Append the fixed CORS and cache-busting headers
///
/// Existing values under the same names are replaced, so each header
/// appears exactly once.
pub fn apply_fixed_headers<B>(mut response: Response<B>) -> Response<B> {
    let headers = response.headers_mut();
    for (name, value) in FIXED_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    response
}
