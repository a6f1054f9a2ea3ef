//! Notification sweep: decide what to send, exactly once per annual cycle.
//!
//! Each birthday moves through one cycle per year:
//!
//! ```text
//! Idle (outside window, notified=false)
//!   -> Due  (inside window, notified=false)
//!   -> Sent (delivery confirmed, notified=true)
//!   -> Idle again once the occurrence rolls over to next year
//! ```
//!
//! The plan construction is pure; the sweep runner around it does the
//! reads, the sending, and the flag commits. Delivery is at-least-once:
//! when any of a birthday's recipients fails, the flag stays unset and the
//! whole birthday is retried on the next sweep, which may re-send to
//! recipients that already got the mail. Exactly-once per recipient would
//! need per-recipient delivery tracking, which this system does not keep.

use chrono::NaiveDate;
use log::{error, info, warn};
use std::collections::HashSet;
use std::sync::Arc;

use crate::backend::domain::email_service::MailSender;
use crate::backend::domain::errors::SweepError;
use crate::backend::domain::models::birthday::Birthday as DomainBirthday;
use crate::backend::domain::proximity;
use crate::backend::storage::csv::{BirthdayRepository, CsvConnection, UserRepository};
use crate::backend::storage::traits::{BirthdayStorage, UserStorage};

/// A notified birthday whose next occurrence is at least this far away has
/// rolled over into the next annual cycle, so its flag is reset.
pub const RESET_MARGIN_DAYS: i64 = 300;

/// One mail to send: a (recipient, birthday) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchEntry {
    pub recipient: String,
    pub birthday_id: String,
    pub name: String,
    pub birthdate: NaiveDate,
}

/// A notified-flag change to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct StateUpdate {
    pub birthday_id: String,
    pub notified: bool,
}

/// What one sweep wants to do, before any I/O happens.
#[derive(Debug, Clone, Default)]
pub struct SweepPlan {
    /// Mails to send, one entry per (recipient, birthday) pair
    pub dispatch: Vec<DispatchEntry>,
    /// Birthdays inside the window awaiting delivery confirmation.
    /// Includes zero-recipient birthdays, which confirm immediately.
    pub due: Vec<String>,
    /// Flag resets for birthdays whose occurrence rolled to next year
    pub resets: Vec<StateUpdate>,
}

/// Outcome of one sweep run.
#[derive(Debug)]
pub struct SweepReport {
    pub evaluated: usize,
    pub dispatched: usize,
    pub marked_sent: usize,
    pub reset: usize,
    pub failures: Vec<SweepError>,
}

/// Build the sweep plan for a set of birthdays with resolved recipients.
///
/// Pure function, no I/O: the caller reads the birthdays, resolves each due
/// birthday's recipients, and later performs the sends and commits.
pub fn build_sweep_plan(
    birthdays: &[(DomainBirthday, Vec<String>)],
    today: NaiveDate,
    threshold_days: i64,
) -> SweepPlan {
    let mut plan = SweepPlan::default();

    for (birthday, recipients) in birthdays {
        let days_until = proximity::days_until_next_occurrence(birthday.birthdate, today);

        if birthday.notified {
            // Sent -> Idle-next-cycle once the occurrence has rolled over
            if days_until >= RESET_MARGIN_DAYS {
                plan.resets.push(StateUpdate {
                    birthday_id: birthday.id.clone(),
                    notified: false,
                });
            }
            continue;
        }

        if !proximity::is_upcoming(days_until, threshold_days) {
            continue;
        }

        // Idle -> Due
        plan.due.push(birthday.id.clone());
        for recipient in recipients {
            plan.dispatch.push(DispatchEntry {
                recipient: recipient.clone(),
                birthday_id: birthday.id.clone(),
                name: birthday.name.clone(),
                birthdate: birthday.birthdate,
            });
        }
    }

    plan
}

/// Service that runs the periodic notification sweep.
pub struct NotificationService<M: MailSender> {
    birthday_repository: BirthdayRepository,
    user_repository: UserRepository,
    mailer: M,
    threshold_days: i64,
}

impl<M: MailSender> NotificationService<M> {
    /// Create a new NotificationService
    pub fn new(connection: Arc<CsvConnection>, mailer: M, threshold_days: i64) -> Self {
        Self {
            birthday_repository: BirthdayRepository::new(connection.clone()),
            user_repository: UserRepository::new(connection),
            mailer,
            threshold_days,
        }
    }

    /// Run one sweep over all birthdays.
    ///
    /// A delivery failure only holds back its own birthday; a storage
    /// failure aborts the sweep. Flag commits for confirmed birthdays go
    /// through the conditional set-if-pending gateway operation, so a
    /// concurrent sweep can never claim the same birthday twice.
    pub fn run_sweep(&self, today: NaiveDate) -> Result<SweepReport, SweepError> {
        info!("🎂 SWEEP: evaluating birthdays for {}", today);

        let birthdays = self
            .birthday_repository
            .list_birthdays()
            .map_err(SweepError::StorageUnavailable)?;
        let evaluated = birthdays.len();

        let mut inputs: Vec<(DomainBirthday, Vec<String>)> = Vec::new();
        for birthday in birthdays {
            let needs_recipients = !birthday.notified
                && proximity::is_upcoming(
                    proximity::days_until_next_occurrence(birthday.birthdate, today),
                    self.threshold_days,
                );

            if !needs_recipients {
                inputs.push((birthday, Vec::new()));
                continue;
            }

            match self.user_repository.list_group_recipients(&birthday.group_id) {
                Ok(recipients) => inputs.push((birthday, recipients)),
                Err(e) => {
                    // Transient: leave the birthday out of this sweep
                    // entirely, it stays Due and is retried next time
                    warn!(
                        "🎂 SWEEP: skipping {}: cannot resolve recipients for group {}: {}",
                        birthday.id, birthday.group_id, e
                    );
                }
            }
        }

        let plan = build_sweep_plan(&inputs, today, self.threshold_days);
        info!(
            "🎂 SWEEP: {} due birthdays, {} mails to send, {} flags to reset",
            plan.due.len(),
            plan.dispatch.len(),
            plan.resets.len()
        );

        let mut failures = Vec::new();
        let mut failed_birthdays: HashSet<&str> = HashSet::new();
        let mut dispatched = 0;
        for entry in &plan.dispatch {
            let occurrence = proximity::next_occurrence(entry.birthdate, today);
            let subject = format!("Upcoming birthday: {}", entry.name);
            let body = format!(
                "Don't forget {}'s birthday on {}!",
                entry.name,
                occurrence.format("%-d %B")
            );

            match self.mailer.send_mail(&entry.recipient, &subject, &body) {
                Ok(()) => dispatched += 1,
                Err(e) => {
                    let failure = SweepError::DeliveryFailed {
                        recipient: entry.recipient.clone(),
                        reason: e.to_string(),
                    };
                    error!("🎂 SWEEP: {}", failure);
                    failed_birthdays.insert(entry.birthday_id.as_str());
                    failures.push(failure);
                }
            }
        }

        let mut marked_sent = 0;
        for birthday_id in &plan.due {
            if failed_birthdays.contains(birthday_id.as_str()) {
                continue;
            }
            if self
                .birthday_repository
                .mark_notified_if_pending(birthday_id)
                .map_err(SweepError::StorageUnavailable)?
            {
                marked_sent += 1;
            }
        }

        let resets: Vec<(String, bool)> = plan
            .resets
            .iter()
            .map(|update| (update.birthday_id.clone(), update.notified))
            .collect();
        self.birthday_repository
            .commit_notified_flags(&resets)
            .map_err(SweepError::StorageUnavailable)?;

        let report = SweepReport {
            evaluated,
            dispatched,
            marked_sent,
            reset: resets.len(),
            failures,
        };
        info!(
            "🎂 SWEEP: done, {} evaluated, {} sent, {} marked notified, {} reset, {} failures",
            report.evaluated,
            report.dispatched,
            report.marked_sent,
            report.reset,
            report.failures.len()
        );
        Ok(report)
    }
}
