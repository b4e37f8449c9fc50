//! Planning API integration.
//!
//! One blocking call per trigger. There is no retry, no timeout and no
//! fallback here: every transport, status or decoding problem is returned as an
//! error and the caller lets it terminate the render pass.

use reqwest::Url;
use reqwest::blocking::{Client, Response};

use crate::domain::{MaintenancePrediction, PlanRequest, PlanResponse};
use crate::error::AppError;

pub struct PlannerClient {
    client: Client,
    endpoint: Url,
}

impl PlannerClient {
    pub fn new(endpoint: Url) -> Result<Self, AppError> {
        // The blocking client defaults to a 30s timeout; the planner call must
        // block until it completes or faults.
        let client = Client::builder()
            .timeout(None::<std::time::Duration>)
            .build()
            .map_err(|e| AppError::runtime(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// `POST {endpoint}` with the weight configuration; decode the plan.
    pub fn request_plan(&self, request: &PlanRequest) -> Result<PlanResponse, AppError> {
        tracing::info!(
            endpoint = %self.endpoint,
            capacity = request.required_capacity,
            w1 = request.weights.w1,
            w2 = request.weights.w2,
            w3 = request.weights.w3,
            w4 = request.weights.w4,
            "requesting induction plan"
        );

        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .map_err(|e| AppError::runtime(format!("Planning request failed: {e}")))?;

        let plan: PlanResponse = decode(resp, "plan")?;
        tracing::info!(
            selected = plan.selected.len(),
            kpis = plan.kpis.len(),
            "induction plan received"
        );
        Ok(plan)
    }

    /// `GET {api}/trains/{id}`: live maintenance prediction for one train.
    pub fn fetch_prediction(&self, train_id: &str) -> Result<MaintenancePrediction, AppError> {
        let url = self.train_url(train_id)?;
        tracing::info!(%url, train_id, "requesting maintenance prediction");

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::runtime(format!("Prediction request failed: {e}")))?;

        let mut prediction: MaintenancePrediction = decode(resp, "prediction")?;
        prediction.train_id = train_id.to_string();
        Ok(prediction)
    }

    /// Resolve `trains/{id}` next to the plan endpoint
    /// (`.../api/plan` → `.../api/trains/{id}`).
    pub fn train_url(&self, train_id: &str) -> Result<Url, AppError> {
        if train_id.is_empty() || train_id.contains(['/', '?', '#']) {
            return Err(AppError::input(format!("Invalid train id '{train_id}'.")));
        }
        self.endpoint
            .join(&format!("trains/{train_id}"))
            .map_err(|e| AppError::input(format!("Cannot build trains URL for '{train_id}': {e}")))
    }
}

fn decode<T: serde::de::DeserializeOwned>(resp: Response, what: &str) -> Result<T, AppError> {
    let status = resp.status();
    if !status.is_success() {
        tracing::error!(%status, "{what} request rejected");
        return Err(AppError::runtime(format!(
            "Planning API {what} request failed with status {status}."
        )));
    }

    resp.json()
        .map_err(|e| AppError::runtime(format!("Failed to parse {what} response: {e}")))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    use reqwest::Url;

    pub(crate) struct Captured {
        pub request_line: String,
        pub body: String,
    }

    /// Serve exactly one canned HTTP response on a loopback port.
    ///
    /// Returns the `/api/plan` URL of the stub and a channel that yields the
    /// captured request once the response has been written.
    pub(crate) fn serve_once(status: &str, body: &str) -> (Url, mpsc::Receiver<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        let status = status.to_string();
        let body = body.to_string();

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();

            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let trimmed = line.trim_end();
                if trimmed.is_empty() {
                    break;
                }
                if let Some((name, value)) = trimmed.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
            }
            let mut buf = vec![0u8; content_length];
            reader.read_exact(&mut buf).unwrap();

            let mut stream = stream;
            let reply = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(reply.as_bytes()).unwrap();
            stream.flush().unwrap();

            let _ = tx.send(Captured {
                request_line: request_line.trim_end().to_string(),
                body: String::from_utf8(buf).unwrap(),
            });
        });

        let url = Url::parse(&format!("http://{addr}/api/plan")).unwrap();
        (url, rx)
    }

    /// A URL nothing listens on.
    pub(crate) fn unreachable_url() -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        Url::parse(&format!("http://{addr}/api/plan")).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{serve_once, unreachable_url};
    use super::*;
    use crate::domain::WeightConfig;

    const PLAN_BODY: &str = r#"{
        "selected": ["T07", "T03"],
        "reasons": {"T07": "fresh certificate", "T03": "needs mileage"},
        "kpis": {"failure_risk_avg": 0.04, "shunting_time": 95}
    }"#;

    #[test]
    fn posts_current_weights_once() {
        let (url, rx) = serve_once("200 OK", PLAN_BODY);
        let client = PlannerClient::new(url).unwrap();

        let mut weights = WeightConfig::default();
        weights.safety = 0.35;
        weights.set_capacity(14);

        let plan = client.request_plan(&weights.to_request()).unwrap();
        assert_eq!(plan.selected, ["T07", "T03"]);
        assert_eq!(plan.kpis[1].name, "shunting_time");
        assert_eq!(plan.kpis[1].value, 95.0);

        let captured = rx.recv().unwrap();
        assert!(captured.request_line.starts_with("POST /api/plan "));
        let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
        assert_eq!(
            sent,
            serde_json::json!({
                "required_capacity": 14,
                "weights": {"w1": 0.35, "w2": 0.2, "w3": 0.1, "w4": 0.1}
            })
        );
    }

    #[test]
    fn non_success_status_is_an_error() {
        let (url, _rx) = serve_once("503 Service Unavailable", r#"{"error": "down"}"#);
        let client = PlannerClient::new(url).unwrap();
        let err = client
            .request_plan(&WeightConfig::default().to_request())
            .unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_RUNTIME);
        assert!(err.message().contains("503"));
    }

    #[test]
    fn malformed_body_is_an_error() {
        let (url, _rx) = serve_once("200 OK", r#"{"selected": ["T1"], "reasons": "#);
        let client = PlannerClient::new(url).unwrap();
        let err = client
            .request_plan(&WeightConfig::default().to_request())
            .unwrap_err();
        assert!(err.message().contains("Failed to parse plan response"));
    }

    #[test]
    fn missing_kpis_is_an_error() {
        let (url, _rx) = serve_once("200 OK", r#"{"selected": [], "reasons": {}}"#);
        let client = PlannerClient::new(url).unwrap();
        assert!(client
            .request_plan(&WeightConfig::default().to_request())
            .is_err());
    }

    #[test]
    fn unreachable_endpoint_is_an_error() {
        let client = PlannerClient::new(unreachable_url()).unwrap();
        let err = client
            .request_plan(&WeightConfig::default().to_request())
            .unwrap_err();
        assert!(err.message().starts_with("Planning request failed"));
    }

    #[test]
    fn fetches_live_prediction() {
        let body = r#"{"failure_prob": 0.2, "shap_top_features": {"fault_count_30d": 4, "days_since_last_service": 40}}"#;
        let (url, rx) = serve_once("200 OK", body);
        let client = PlannerClient::new(url).unwrap();

        let p = client.fetch_prediction("T15").unwrap();
        assert_eq!(p.train_id, "T15");
        assert_eq!(p.failure_prob_label(), "20.0%");
        assert_eq!(p.features[0].name, "fault_count_30d");

        let captured = rx.recv().unwrap();
        assert!(captured.request_line.starts_with("GET /api/trains/T15 "));
    }

    #[test]
    fn train_url_is_resolved_next_to_plan_endpoint() {
        let url = Url::parse("http://localhost:8080/api/plan").unwrap();
        let client = PlannerClient::new(url).unwrap();
        assert_eq!(
            client.train_url("T19").unwrap().as_str(),
            "http://localhost:8080/api/trains/T19"
        );
        assert!(client.train_url("../admin").is_err());
    }
}
