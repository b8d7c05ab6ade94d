//! Poll tasks
//!
//! One [`PollTask`] per backend endpoint. A poll cycle is a single GET,
//! a decode into the matching model type and an outcome the dashboard can
//! render. Each cycle runs under an abort registration so the session can
//! drop late responses.

use async_trait::async_trait;
use futures_util::future::{AbortRegistration, Abortable};
use serde_json::Value;
use std::fmt;

use crate::error::{FetchError, FetchResult};
use crate::model::{CostPrediction, HourlyPayload, PeriodTotals, PieData, RealtimeSnapshot};

pub const FETCH_FAILED: &str = "Gagal mengambil data. Akan mencoba lagi...";
pub const SUMMARY_FETCH_FAILED: &str = "Gagal mengambil data summary. Akan mencoba lagi...";

/// A periodically polled endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PollTask {
    Realtime,
    Prediction,
    Totals,
    Daily,
    Hourly,
    Pie,
}

impl PollTask {
    pub const ALL: [PollTask; 6] = [
        PollTask::Realtime,
        PollTask::Prediction,
        PollTask::Totals,
        PollTask::Daily,
        PollTask::Hourly,
        PollTask::Pie,
    ];

    /// Endpoint path relative to the API base
    pub fn path(&self) -> &'static str {
        match self {
            PollTask::Realtime => "/realtime",
            PollTask::Prediction => "/index/prediksi",
            PollTask::Totals => "/get_totals",
            PollTask::Daily => "/get_daily",
            PollTask::Hourly => "/get_hourly",
            PollTask::Pie => "/get_pie",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PollTask::Realtime => "realtime",
            PollTask::Prediction => "prediction",
            PollTask::Totals => "totals",
            PollTask::Daily => "daily",
            PollTask::Hourly => "hourly",
            PollTask::Pie => "pie",
        }
    }

    /// Banner text shown when this task fails
    pub fn failure_message(&self) -> &'static str {
        match self {
            PollTask::Prediction => SUMMARY_FETCH_FAILED,
            _ => FETCH_FAILED,
        }
    }
}

impl fmt::Display for PollTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// JSON transport to the metering backend
#[async_trait(?Send)]
pub trait Backend {
    /// GET `path` and parse the body as JSON
    async fn get_json(&self, path: &str) -> FetchResult<Value>;
}

/// A decoded response, tagged by endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Realtime(RealtimeSnapshot),
    Prediction(CostPrediction),
    Totals(PeriodTotals),
    Daily(PeriodTotals),
    Hourly(HourlyPayload),
    Pie(PieData),
}

impl Payload {
    pub fn task(&self) -> PollTask {
        match self {
            Payload::Realtime(_) => PollTask::Realtime,
            Payload::Prediction(_) => PollTask::Prediction,
            Payload::Totals(_) => PollTask::Totals,
            Payload::Daily(_) => PollTask::Daily,
            Payload::Hourly(_) => PollTask::Hourly,
            Payload::Pie(_) => PollTask::Pie,
        }
    }
}

/// Decode a response body for a task
pub fn decode(task: PollTask, body: Value) -> FetchResult<Payload> {
    let payload = match task {
        PollTask::Realtime => Payload::Realtime(RealtimeSnapshot::from_value(body)?),
        PollTask::Prediction => Payload::Prediction(decode_object(task, body)?),
        PollTask::Totals => Payload::Totals(decode_object(task, body)?),
        PollTask::Daily => Payload::Daily(decode_object(task, body)?),
        PollTask::Hourly => Payload::Hourly(HourlyPayload::from_value(body)?),
        PollTask::Pie => Payload::Pie(decode_object(task, body)?),
    };
    Ok(payload)
}

fn decode_object<T: serde::de::DeserializeOwned>(task: PollTask, body: Value) -> FetchResult<T> {
    if !body.is_object() {
        return Err(FetchError::Malformed(format!(
            "{} payload is {}, expected an object",
            task,
            crate::model::de::kind(&body)
        )));
    }
    Ok(serde_json::from_value(body)?)
}

/// Result of one poll cycle
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Fetched(Payload),
    Failed { task: PollTask, error: FetchError },
    /// Aborted by the session; nothing may be rendered
    Cancelled(PollTask),
}

impl PollOutcome {
    pub fn task(&self) -> PollTask {
        match self {
            PollOutcome::Fetched(payload) => payload.task(),
            PollOutcome::Failed { task, .. } => *task,
            PollOutcome::Cancelled(task) => *task,
        }
    }
}

async fn fetch_payload<B: Backend + ?Sized>(backend: &B, task: PollTask) -> FetchResult<Payload> {
    let body = backend.get_json(task.path()).await?;
    decode(task, body)
}

/// Run one poll cycle, abortable through `registration`
pub async fn fetch<B: Backend + ?Sized>(
    backend: &B,
    task: PollTask,
    registration: AbortRegistration,
) -> PollOutcome {
    match Abortable::new(fetch_payload(backend, task), registration).await {
        Ok(Ok(payload)) => PollOutcome::Fetched(payload),
        Ok(Err(FetchError::Aborted)) | Err(_) => PollOutcome::Cancelled(task),
        Ok(Err(error)) => PollOutcome::Failed { task, error },
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeBackend;
    use super::*;
    use futures_util::future::AbortHandle;
    use serde_json::json;

    fn registration() -> AbortRegistration {
        AbortHandle::new_pair().1
    }

    #[test]
    fn test_task_table() {
        assert_eq!(PollTask::Prediction.path(), "/index/prediksi");
        assert_eq!(PollTask::Pie.path(), "/get_pie");
        assert_eq!(PollTask::Hourly.to_string(), "hourly");
        assert_eq!(
            PollTask::Prediction.failure_message(),
            "Gagal mengambil data summary. Akan mencoba lagi..."
        );
        assert_eq!(
            PollTask::Totals.failure_message(),
            "Gagal mengambil data. Akan mencoba lagi..."
        );
    }

    #[test]
    fn test_decode_routes_by_task() {
        let body = json!({"total_energi": 12.5, "total_tagihan": "18000"});
        let Payload::Daily(totals) = decode(PollTask::Daily, body.clone()).unwrap() else {
            panic!("expected daily payload");
        };
        assert_eq!(totals.bill, 18000.0);

        let payload = decode(PollTask::Totals, body).unwrap();
        assert_eq!(payload.task(), PollTask::Totals);
    }

    #[test]
    fn test_decode_rejects_non_object() {
        let err = decode(PollTask::Prediction, json!([1, 2])).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));

        let err = decode(PollTask::Realtime, json!({"departments": {}})).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let backend =
            FakeBackend::default().with("/index/prediksi", Ok(json!({"cost_pred": 250000.5})));

        let outcome = fetch(&backend, PollTask::Prediction, registration()).await;
        assert_eq!(
            outcome,
            PollOutcome::Fetched(Payload::Prediction(CostPrediction { cost_pred: 250000.5 }))
        );
        assert_eq!(*backend.requests.borrow(), vec!["/index/prediksi".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_failure_reports_task() {
        let backend = FakeBackend::default();
        let outcome = fetch(&backend, PollTask::Pie, registration()).await;
        match outcome {
            PollOutcome::Failed { task, error } => {
                assert_eq!(task, PollTask::Pie);
                assert_eq!(
                    error,
                    FetchError::Http {
                        status: 404,
                        path: "/get_pie".to_string()
                    }
                );
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_aborted_fetch_is_cancelled() {
        let backend = FakeBackend::default().with("/realtime", Ok(json!({"departments": []})));
        let (handle, registration) = AbortHandle::new_pair();
        handle.abort();

        let outcome = fetch(&backend, PollTask::Realtime, registration).await;
        assert_eq!(outcome, PollOutcome::Cancelled(PollTask::Realtime));
        assert!(backend.requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_transport_abort_is_cancelled() {
        let backend = FakeBackend::default().with("/get_hourly", Err(FetchError::Aborted));
        let outcome = fetch(&backend, PollTask::Hourly, registration()).await;
        assert_eq!(outcome.task(), PollTask::Hourly);
        assert!(matches!(outcome, PollOutcome::Cancelled(_)));
    }
}
