use serde::Serialize;

#[derive(Serialize)]
pub struct TestProbeResponse {
    pub success: bool,
    pub message: String,
}
