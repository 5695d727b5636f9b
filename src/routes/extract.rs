use axum::extract::FromRequest;

use crate::error::Error;

/// JSON body extractor whose rejections use the crate's tagged error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);
