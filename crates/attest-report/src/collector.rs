use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use attest_core::{CheckId, DiagnosticValue};

use crate::error::ReportError;
use crate::observer::{ObservedReport, ReportObserver};

/// A verdict sent from a check task to the report writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    Pass(CheckId),
    Fail {
        check: CheckId,
        actual: DiagnosticValue,
        expected: DiagnosticValue,
    },
}

/// Cloneable handle that check tasks use to report verdicts.
#[derive(Debug, Clone)]
pub struct SignalSender {
    tx: mpsc::UnboundedSender<Signal>,
}

impl SignalSender {
    pub fn send(&self, signal: Signal) -> Result<(), ReportError> {
        self.tx
            .send(signal)
            .map_err(|_| ReportError::CollectorClosed)
    }

    pub fn pass(&self, check: CheckId) -> Result<(), ReportError> {
        self.send(Signal::Pass(check))
    }

    pub fn fail(
        &self,
        check: CheckId,
        actual: impl Into<DiagnosticValue>,
        expected: impl Into<DiagnosticValue>,
    ) -> Result<(), ReportError> {
        self.send(Signal::Fail {
            check,
            actual: actual.into(),
            expected: expected.into(),
        })
    }
}

/// Funnels verdicts from concurrently running checks into one report.
///
/// The report is moved into a single writer task, so at most one mutation is
/// ever in flight. [`finish`](Self::finish) returns the report only after
/// every [`SignalSender`] has been dropped and every signal applied.
pub struct ReportCollector<O> {
    sender: SignalSender,
    writer: JoinHandle<ObservedReport<O>>,
}

impl<O> ReportCollector<O>
where
    O: ReportObserver + 'static,
{
    /// Start the writer task. Must be called from within a tokio runtime.
    pub fn spawn(mut report: ObservedReport<O>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Signal>();

        let writer = tokio::spawn(async move {
            while let Some(signal) = rx.recv().await {
                match signal {
                    Signal::Pass(check) => {
                        report.record_pass(check);
                    }
                    Signal::Fail {
                        check,
                        actual,
                        expected,
                    } => {
                        report.record_failure(check, actual, expected);
                    }
                }
            }
            tracing::trace!(attempt = %report.report().attempt(), "report writer drained");
            report
        });

        Self {
            sender: SignalSender { tx },
            writer,
        }
    }

    /// A new handle for a check task.
    pub fn sender(&self) -> SignalSender {
        self.sender.clone()
    }

    /// Close the collector's own handle and wait for the writer to drain.
    ///
    /// Waits until all outstanding senders are dropped, so callers must
    /// join their check tasks (or drop their senders) first.
    pub async fn finish(self) -> Result<ObservedReport<O>, ReportError> {
        drop(self.sender);
        self.writer
            .await
            .map_err(|e| ReportError::WriterPanicked(e.to_string()))
    }
}
