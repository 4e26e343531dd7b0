use crate::http::request::Request;
use crate::http::response::Response;

/// Application code for one route. It reads the request and fills in the
/// response it is handed; nothing is returned.
pub type HandlerFunc = Box<dyn Fn(&Request, &mut Response) + Sync + Send>;
