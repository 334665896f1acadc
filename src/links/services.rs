use axum::http::{header, HeaderMap};
use qrcode::{render::svg, QrCode};
use uuid::Uuid;

/// Public origin for deep links: the configured site URL, else the request's own origin.
pub fn resolve_base_url(site_url: Option<&str>, headers: &HeaderMap) -> Option<String> {
    if let Some(url) = site_url {
        return Some(url.to_string());
    }
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|h| !h.is_empty())?;
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        // proxies append, so the first hop is the client-facing one
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|p| *p == "http" || *p == "https")
        .unwrap_or("http");
    Some(format!("{scheme}://{host}"))
}

pub fn form_link(base_url: &str, teacher_id: Uuid) -> String {
    format!("{}/form/{}", base_url.trim_end_matches('/'), teacher_id)
}

pub fn render_qr_svg(link: &str) -> Result<String, qrcode::types::QrError> {
    let code = QrCode::new(link.as_bytes())?;
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(256, 256)
        .quiet_zone(true)
        .build())
}
