use super::{CompletedTraining, Dispatch, Session};
use crate::error::{SessionError, SessionResult};
use foresight_training::ResultView;
use tracing::{debug, error, info};

impl Session {
    /// Builds a training request from the current store and dispatches it.
    ///
    /// Fails with `MissingPrerequisite` (or `InvalidParameter`) without any
    /// network call when the store cannot produce a request. On success the
    /// result is stored along with the family that was trained and returned
    /// as a display projection.
    pub async fn submit_training(&self) -> SessionResult<Dispatch<ResultView>> {
        if self.is_busy() {
            debug!("Training trigger ignored while another request is in flight");
            return Ok(Dispatch::Ignored);
        }

        let request = self.store.borrow().snapshot().request();
        let request = match request {
            Ok(request) => request,
            Err(e) => return Err(self.reject(e)),
        };
        let Some(token) = self.begin() else {
            return Ok(Dispatch::Ignored);
        };

        info!(
            identifier = %request.dataset_identifier,
            target = %request.target_column,
            model_type = %request.model_type.as_str(),
            "Dispatching training request"
        );

        let outcome = self.run_phase(&token, self.backend.train(&request), SessionError::training).await;
        let outcome = outcome.map(|result| {
            let training = CompletedTraining { family: request.model_type, result };
            let view = training.view();
            self.store.borrow_mut().store_training(training);
            view
        });

        match &outcome {
            Ok(view) => info!(model_type = %view.family.as_str(), mse = view.mse, rmse = view.rmse, "Training completed"),
            Err(e) => error!(model_type = %request.model_type.as_str(), error = %e, "Training failed"),
        }
        self.finish(&outcome);
        outcome.map(Dispatch::Completed)
    }
}
