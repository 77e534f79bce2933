//! Report poller — submits asynchronous report jobs and waits for them.

use crate::session::{ApiRequest, SessionManager};
use crate::wire::{self, ReportStatusBody, ReportSubmitted};
use campaign_core::config::ReportPollConfig;
use campaign_core::error::{DspError, DspResult};
use campaign_core::report::{ReportJob, ReportRequest, ReportStatus};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct ReportPoller {
    session: Arc<SessionManager>,
    interval: Duration,
    max_attempts: u32,
}

impl ReportPoller {
    pub fn new(session: Arc<SessionManager>, config: &ReportPollConfig) -> Self {
        Self {
            session,
            interval: Duration::from_millis(config.poll_interval_ms),
            max_attempts: config.max_attempts,
        }
    }

    /// Submit a report job and return its id.
    pub async fn request_report(&self, request: &ReportRequest, scope: Option<String>) -> DspResult<String> {
        let body = serde_json::to_value(request)?;
        let submitted: ReportSubmitted = self
            .session
            .authorized_call(&ApiRequest::post(wire::REPORTS_PATH, body).with_scope(scope))
            .await?;
        let report_id = wire::id_to_string(&submitted.report_id);
        info!(report_id = %report_id, "Report job submitted");
        Ok(report_id)
    }

    /// Poll a report job until it completes, fails, exhausts the attempt
    /// budget, or `cancel` resolves.
    ///
    /// Each attempt waits one interval before checking status. A completed
    /// job is downloaded exactly once.
    pub async fn await_report<C>(
        &self,
        report_id: &str,
        scope: Option<String>,
        cancel: C,
    ) -> DspResult<serde_json::Value>
    where
        C: Future<Output = ()>,
    {
        tokio::pin!(cancel);
        let mut job = ReportJob::new(report_id);

        while job.attempts < self.max_attempts {
            tokio::select! {
                _ = &mut cancel => {
                    warn!(report_id, attempts = job.attempts, "Report polling cancelled");
                    return Err(DspError::Cancelled);
                }
                _ = tokio::time::sleep(self.interval) => {}
            }

            let status_request = ApiRequest::get(wire::report_path(report_id)).with_scope(scope.clone());
            let status_body: ReportStatusBody = tokio::select! {
                _ = &mut cancel => {
                    warn!(report_id, attempts = job.attempts, "Report polling cancelled");
                    return Err(DspError::Cancelled);
                }
                result = self.session.authorized_call::<ReportStatusBody>(&status_request) => result?,
            };

            metrics::counter!("dsp.report_polls").increment(1);
            let status = job.observe(ReportStatus::from_remote(&status_body.status));
            debug!(report_id, attempt = job.attempts, remote_status = %status_body.status, "Report status checked");

            match status {
                ReportStatus::Completed => {
                    info!(report_id, attempts = job.attempts, "Report completed, downloading");
                    let download = ApiRequest::get(wire::report_download_path(report_id)).with_scope(scope);
                    return tokio::select! {
                        _ = &mut cancel => {
                            warn!(report_id, "Report download cancelled");
                            Err(DspError::Cancelled)
                        }
                        result = self.session.authorized_call::<serde_json::Value>(&download) => result,
                    };
                }
                ReportStatus::Failed => {
                    warn!(report_id, attempts = job.attempts, "Report failed");
                    return Err(DspError::ReportFailed {
                        report_id: report_id.to_string(),
                    });
                }
                ReportStatus::Pending => {}
            }
        }

        warn!(report_id, attempts = job.attempts, "Report still pending, giving up");
        Err(DspError::ReportTimeout {
            attempts: job.attempts,
        })
    }

    /// Submit a report job and wait for its payload.
    pub async fn run_report<C>(
        &self,
        request: &ReportRequest,
        scope: Option<String>,
        cancel: C,
    ) -> DspResult<serde_json::Value>
    where
        C: Future<Output = ()>,
    {
        let report_id = self.request_report(request, scope.clone()).await?;
        self.await_report(&report_id, scope, cancel).await
    }
}
