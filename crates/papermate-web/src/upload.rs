use axum::extract::Multipart;
use axum::http::HeaderMap;

/// An uploaded PDF with its data and original filename.
pub struct UploadedPdf {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Per-request model credentials, passed as headers so the server never
/// stores a key.
pub struct ModelCreds {
    pub api_key: String,
    pub model: String,
}

impl ModelCreds {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, String> {
        let api_key = header_value(headers, "x-api-key")?;
        let model = header_value(headers, "x-model-name")?;
        Ok(Self { api_key, model })
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Result<String, String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .ok_or_else(|| format!("Missing required header: {}", name))
}

/// Parse a multipart form upload into the PDF it carries.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<UploadedPdf, String> {
    let mut file: Option<UploadedPdf> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Failed to read form field: {}", e))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "pdf" => {
                let filename = field.file_name().unwrap_or("upload.pdf").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Failed to read file data: {}", e))?
                    .to_vec();

                // Verify PDF magic bytes
                if !data.starts_with(b"%PDF-") {
                    return Err("Uploaded file does not appear to be a valid PDF".to_string());
                }

                file = Some(UploadedPdf { filename, data });
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await;
            }
        }
    }

    file.ok_or_else(|| "No PDF file uploaded".to_string())
}
