//! HTTP handlers and small response helpers.

use crate::Resolver;
use axum::{
	body::Body,
	extract::{Path, State},
	http::header,
	response::Response,
};
use previewer_core::Blob;
use previewer_image::mime_type;
use std::sync::Arc;

/// Handles `/resize/{width}/{height}/{bucket}/{*key}`.
///
/// Malformed dimensions and bucket names are answered with 400. Every other failure is an
/// upstream problem and answered with 502, carrying the error message as plain text.
pub async fn serve_resize(
	Path((width, height, bucket, key)): Path<(String, String, String, String)>,
	State(resolver): State<Arc<Resolver>>,
) -> Response<Body> {
	log::debug!("handle resize request: {width}x{height} {bucket}/{key}");

	let (Ok(width_px), Ok(height_px)) = (width.parse::<i64>(), height.parse::<i64>()) else {
		log::debug!("send 400 for unparsable dimensions '{width}x{height}'");
		return error_with(400, &format!("invalid dimensions '{width}x{height}'"));
	};

	if !is_bucket_name(&bucket) {
		log::debug!("send 400 for bucket name '{bucket}'");
		return error_with(400, &format!("invalid bucket name '{bucket}'"));
	}

	match resolver.resolve(width_px, height_px, &bucket, &key).await {
		Ok(blob) => {
			log::debug!("send response for {bucket}/{key} ({} bytes)", blob.len());
			ok_image(blob)
		}
		Err(err) if err.is_client_error() => {
			log::debug!("send 400 for {bucket}/{key}: {err}");
			error_with(400, &err.to_string())
		}
		Err(err) => {
			log::warn!("send 502 for {bucket}/{key}: {err}");
			error_with(502, &err.to_string())
		}
	}
}

/// Bucket names consist of ASCII letters and hyphens. Host names with dots or ports, and IP
/// addresses, are refused.
fn is_bucket_name(bucket: &str) -> bool {
	!bucket.is_empty() && bucket.bytes().all(|b| b.is_ascii_alphabetic() || b == b'-')
}

pub async fn serve_not_found() -> Response<Body> {
	error_404()
}

fn ok_image(blob: Blob) -> Response<Body> {
	Response::builder()
		.status(200)
		.header(header::CONTENT_TYPE, mime_type(&blob))
		.header(header::CONTENT_LENGTH, blob.len())
		.body(Body::from(blob.into_vec()))
		.expect("failed to build image response")
}

fn error_with(status: u16, message: &str) -> Response<Body> {
	Response::builder()
		.status(status)
		.header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
		.body(Body::from(message.as_bytes().to_vec()))
		.expect("failed to build error response")
}

pub fn error_404() -> Response<Body> {
	error_with(404, "Not Found")
}
