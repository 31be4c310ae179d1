//! End-to-end session workflows against the scripted backend.

use foresight_core::{ClientConfig, Dispatch, Session, SessionError};
use foresight_models::MockBackend;
use foresight_training::{
    BackendError, DatasetFile, EncodedImage, ModelFamily, ParamValue, TrainingResult,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

fn session_with(backend: MockBackend) -> (Session, Arc<MockBackend>) {
    let backend = Arc::new(backend);
    (Session::new(backend.clone()), backend)
}

fn csv() -> DatasetFile {
    DatasetFile::new("series.csv", b"a,b\n1,2\n".to_vec())
}

async fn ingest(session: &Session) {
    session.select_file(csv());
    session.upload().await.unwrap();
}

/// Yields until the session reports an attempt in flight.
async fn until_busy(session: &Session) {
    for _ in 0..100 {
        if session.is_busy() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("session never became busy");
}

#[tokio::test]
async fn test_training_without_dataset_makes_no_call() {
    let (session, backend) = session_with(MockBackend::default());

    let err = session.submit_training().await.unwrap_err();

    assert!(matches!(err, SessionError::MissingPrerequisite(_)));
    assert_eq!(backend.calls(), 0);
    let store = session.store();
    assert!(!store.is_busy());
    assert_eq!(store.last_error(), Some("Please upload a file and select a target column first."));
}

#[tokio::test]
async fn test_upload_without_file_makes_no_call() {
    let (session, backend) = session_with(MockBackend::default());

    assert_eq!(session.upload().await.unwrap_err(), SessionError::NoFileSelected);
    assert_eq!(backend.calls(), 0);
    assert_eq!(session.store().last_error(), Some("Please select a file first."));
}

#[tokio::test]
async fn test_successful_ingestion_defaults_target_to_first_column() {
    let (session, backend) = session_with(MockBackend::default().with_columns(["a", "b"]));
    session.set_family(ModelFamily::Lstm);
    session.set_parameter("lstmUnits", "80");
    session.select_file(csv());

    let dataset = session.upload().await.unwrap().completed().unwrap();

    assert_eq!(dataset.identifier(), "series.csv");
    assert_eq!(dataset.columns(), ["a", "b"]);
    assert!(!dataset.preview_rows().is_empty());
    assert_eq!(backend.upload_calls(), 1);
    assert_eq!(backend.preview_calls(), 1);

    let store = session.store();
    assert_eq!(store.target_column(), Some("a"));
    assert_eq!(store.dataset(), Some(&dataset));
    assert_eq!(store.family(), ModelFamily::Lstm);
    assert_eq!(store.parameters().get("lstmUnits"), Some("80"));
    assert!(!store.is_busy());
    assert!(store.last_error().is_none());
}

#[tokio::test]
async fn test_failed_uploads_leave_dataset_unset() {
    let (session, backend) =
        session_with(MockBackend::default().failing_upload(BackendError::Status { status: 500, message: None }));
    session.select_file(csv());

    for attempt in 1..=2 {
        let err = session.upload().await.unwrap_err();
        assert_eq!(err, SessionError::Upload("File upload failed".to_string()));

        let store = session.store();
        assert!(store.dataset().is_none());
        assert!(store.target_column().is_none());
        assert!(!store.is_busy());
        assert_eq!(store.last_error(), Some("File upload failed"));
        assert_eq!(backend.upload_calls(), attempt);
    }
    assert_eq!(backend.preview_calls(), 0);
}

#[tokio::test]
async fn test_preview_failure_keeps_uploaded_columns() {
    let (session, backend) = session_with(
        MockBackend::default()
            .with_columns(["a", "b"])
            .failing_preview(BackendError::Status { status: 404, message: None }),
    );
    session.select_file(csv());

    let err = session.upload().await.unwrap_err();
    assert_eq!(err, SessionError::Preview("Failed to get data preview".to_string()));

    {
        let store = session.store();
        let dataset = store.dataset().unwrap();
        assert_eq!(dataset.columns(), ["a", "b"]);
        assert!(dataset.preview().is_none());
        assert_eq!(store.target_column(), Some("a"));
        assert!(!store.is_busy());
    }

    // Retrying the preview does not upload again.
    assert!(session.retry_preview().await.is_err());
    assert_eq!(backend.upload_calls(), 1);
    assert_eq!(backend.preview_calls(), 2);

    // Training can still proceed on the partial dataset.
    assert!(session.submit_training().await.is_ok());
}

#[tokio::test]
async fn test_retry_preview_requires_dataset() {
    let (session, backend) = session_with(MockBackend::default());
    assert!(matches!(session.retry_preview().await, Err(SessionError::MissingPrerequisite(_))));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_retry_preview_keeps_target() {
    let (session, backend) = session_with(MockBackend::default().with_columns(["a", "b"]));
    ingest(&session).await;
    session.set_target_column("b").unwrap();

    let dataset = session.retry_preview().await.unwrap().completed().unwrap();

    assert!(dataset.preview().is_some());
    assert_eq!(session.store().target_column(), Some("b"));
    assert_eq!(backend.preview_calls(), 2);
}

#[tokio::test]
async fn test_arima_request_carries_only_arima_params() {
    let (session, backend) = session_with(MockBackend::default());
    ingest(&session).await;
    session.set_parameter("epochs", "99");
    session.set_family(ModelFamily::Arima);
    for name in ["p", "d", "q"] {
        assert!(session.set_parameter(name, "1"));
    }
    assert!(!session.set_parameter("numFilters", "8"));

    let view = session.submit_training().await.unwrap().completed().unwrap();

    let request = backend.last_request().unwrap();
    let expected: BTreeMap<String, ParamValue> =
        ["p", "d", "q"].into_iter().map(|name| (name.to_string(), ParamValue::Integer(1))).collect();
    assert_eq!(request.params, expected);
    assert_eq!(request.model_type, ModelFamily::Arima);
    assert_eq!(request.target_column, "date");
    assert!(view.aic.is_some());
    assert!(view.history.is_none());
}

#[tokio::test]
async fn test_cnn_result_without_history_renders_core_metrics() {
    let result = TrainingResult {
        mse: 0.5,
        rmse: 0.71,
        plot: EncodedImage("<data>".to_string()),
        aic: None,
        mape: None,
        feature_importance: None,
        history: None,
        training_time: None,
    };
    let (session, _backend) = session_with(MockBackend::default().with_result(result.clone()));
    ingest(&session).await;

    let view = session.submit_training().await.unwrap().completed().unwrap();

    assert_eq!((view.mse, view.rmse), (0.5, 0.71));
    assert_eq!(view.plot, EncodedImage("<data>".to_string()));
    assert!(view.history.is_none());
    let store = session.store();
    assert!(store.last_error().is_none());
    assert_eq!(store.last_training().map(|t| &t.result), Some(&result));
}

#[tokio::test]
async fn test_second_submission_while_busy_is_ignored() {
    let (session, backend) = session_with(MockBackend::default().with_latency(Duration::from_millis(50)));
    ingest(&session).await;

    let (first, second) = tokio::join!(session.submit_training(), session.submit_training());
    let outcomes = [first.unwrap(), second.unwrap()];

    assert_eq!(outcomes.iter().filter(|o| o.is_ignored()).count(), 1);
    assert_eq!(backend.train_calls(), 1);
    assert!(!session.is_busy());
}

#[tokio::test]
async fn test_upload_ignored_while_training() {
    let (session, backend) = session_with(MockBackend::default().with_latency(Duration::from_millis(50)));
    ingest(&session).await;

    let training = session.submit_training();
    tokio::pin!(training);
    tokio::select! {
        biased;
        _ = &mut training => panic!("training finished before the check"),
        () = until_busy(&session) => {}
    }

    assert_eq!(session.upload().await.unwrap(), Dispatch::Ignored);
    assert_eq!(session.submit_training().await.unwrap(), Dispatch::Ignored);
    assert!(training.await.is_ok());
    assert_eq!(backend.upload_calls(), 1);
    assert_eq!(backend.train_calls(), 1);
}

#[tokio::test]
async fn test_training_failure_keeps_other_state() {
    let (session, _backend) = session_with(
        MockBackend::default()
            .failing_train(BackendError::Status { status: 400, message: Some("Series too short".to_string()) }),
    );
    ingest(&session).await;
    session.set_parameter("epochs", "5");

    let err = session.submit_training().await.unwrap_err();

    assert_eq!(err, SessionError::TrainingFailed("Series too short".to_string()));
    let store = session.store();
    assert_eq!(store.last_error(), Some("Series too short"));
    assert!(!store.is_busy());
    assert!(store.dataset().is_some());
    assert_eq!(store.parameters().get("epochs"), Some("5"));
    assert!(store.last_training().is_none());
}

#[tokio::test]
async fn test_new_attempt_clears_previous_error() {
    let (session, _backend) = session_with(MockBackend::default());
    assert!(session.submit_training().await.is_err());
    assert!(session.store().last_error().is_some());

    ingest(&session).await;
    assert!(session.store().last_error().is_none());
    session.submit_training().await.unwrap();
    assert!(session.store().last_error().is_none());
}

#[tokio::test]
async fn test_invalid_parameter_makes_no_call() {
    let (session, backend) = session_with(MockBackend::default());
    ingest(&session).await;
    session.set_parameter("kernelSize", "wide");

    let err = session.submit_training().await.unwrap_err();

    assert_eq!(err, SessionError::InvalidParameter { name: "kernelSize".to_string(), value: "wide".to_string() });
    assert_eq!(backend.train_calls(), 0);
    assert!(!session.is_busy());
}

#[tokio::test]
async fn test_result_stays_bound_to_family_that_ran() {
    let (session, _backend) = session_with(MockBackend::default());
    ingest(&session).await;
    session.submit_training().await.unwrap();

    session.set_family(ModelFamily::Prophet);

    let store = session.store();
    let training = store.last_training().unwrap();
    assert_eq!(training.family, ModelFamily::Cnn);
    assert!(training.view().history.is_some());
}

#[tokio::test]
async fn test_cancel_in_flight_upload() {
    let (session, backend) = session_with(MockBackend::default().with_latency(Duration::from_secs(30)));
    session.select_file(csv());
    let upload = session.upload();
    tokio::pin!(upload);
    tokio::select! {
        biased;
        _ = &mut upload => panic!("upload finished before cancel"),
        () = until_busy(&session) => {}
    }

    assert!(session.cancel());
    assert_eq!(upload.await.unwrap_err(), SessionError::Cancelled);

    let store = session.store();
    assert!(!store.is_busy());
    assert!(store.dataset().is_none());
    assert_eq!(store.last_error(), Some("Request cancelled"));
    assert_eq!(backend.preview_calls(), 0);
    drop(store);
    assert!(!session.cancel());
}

#[tokio::test]
async fn test_timeout_clears_busy() {
    let (session, _backend) = session_with(MockBackend::default().with_latency(Duration::from_millis(500)));
    let session = session.with_timeout(Some(Duration::from_millis(20)));
    session.select_file(csv());

    let err = session.upload().await.unwrap_err();

    assert_eq!(err, SessionError::TimedOut(Duration::from_millis(20)));
    assert!(!session.is_busy());
    assert!(session.store().dataset().is_none());
}

#[tokio::test]
async fn test_session_from_config() {
    let config = ClientConfig {
        backend: Some("mock".to_string()),
        default_model: Some("xgboost".to_string()),
        ..Default::default()
    };
    let session = Session::from_config(&config).unwrap();
    assert_eq!(session.backend().id(), "mock");
    assert_eq!(session.store().family(), ModelFamily::XgBoost);

    session.select_file(csv());
    session.upload().await.unwrap();
    let view = session.submit_training().await.unwrap().completed().unwrap();
    assert!(view.feature_importance.is_some());
    assert!(view.training_time.is_some());
}
