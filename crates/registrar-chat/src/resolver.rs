//! Keyword resolver over the student roster.
//!
//! Maps a free-text query to a [`BotResponse`] with a fixed cascade of
//! case-insensitive substring checks. The cascade is total: every input
//! yields a response and the matcher never produces [`ResponseKind::Error`].

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use registrar_core::config::ResolverConfig;
use registrar_core::records::{find_mentioned, RecordStore, StudentRecord};
use serde::Serialize;

use crate::error::ChatError;
use crate::types::{BotResponse, ResponseKind};

pub const ATTENDANCE_CONFIDENCE: f64 = 0.95;
pub const GRADE_CONFIDENCE: f64 = 0.92;
pub const PARTIAL_CONFIDENCE: f64 = 0.88;
pub const LIST_CONFIDENCE: f64 = 1.0;
pub const NO_MATCH_CONFIDENCE: f64 = 0.3;

pub const HELP_ANSWER: &str = "I can help you with:\n\
• Student attendance records\n\
• Student grades and marks\n\
• Student information lookup\n\n\
Try asking: \"What is Alice Johnson's attendance?\" or \"Show me Bob's grades\"";

pub const NO_MATCH_ANSWER: &str = "I couldn't find specific information matching your query. \
Try asking about a specific student's attendance, marks, or grades. \
For example: 'What was Alice Johnson's attendance?'";

const GRADE_KEYWORDS: &[&str] = &["marks", "grade", "score"];
const LIST_KEYWORDS: &[&str] = &["all students", "list students"];
const HELP_KEYWORDS: &[&str] = &["help", "what can you do"];

#[derive(Serialize)]
struct AttendanceEvidence<'a> {
    #[serde(rename = "studentId")]
    student_id: &'a str,
    name: &'a str,
    attendance: &'a str,
}

#[derive(Serialize)]
struct GradeEvidence<'a> {
    #[serde(rename = "studentId")]
    student_id: &'a str,
    name: &'a str,
    grade: &'a str,
    marks: u32,
}

// =============================================================================
// Matching cascade
// =============================================================================

/// Resolve `query` against `records`.
///
/// Records are scanned in slice order and the first one mentioned by full
/// or first name wins. Without a student mention the query falls through
/// to the roster listing, the help text, and finally a low-confidence miss.
pub fn resolve(query: &str, records: &[StudentRecord]) -> BotResponse {
    let lower = query.to_lowercase();

    if let Some(student) = find_mentioned(records, &lower) {
        return resolve_student(&lower, student);
    }

    if contains_any(&lower, LIST_KEYWORDS) {
        return list_students(records);
    }

    if contains_any(&lower, HELP_KEYWORDS) {
        return BotResponse::new(ResponseKind::None, HELP_ANSWER);
    }

    BotResponse::new(ResponseKind::None, NO_MATCH_ANSWER).with_confidence(NO_MATCH_CONFIDENCE)
}

fn resolve_student(lower: &str, student: &StudentRecord) -> BotResponse {
    if lower.contains("attendance") {
        let evidence = to_evidence(&AttendanceEvidence {
            student_id: &student.id,
            name: &student.name,
            attendance: &student.attendance,
        });
        return BotResponse::new(
            ResponseKind::Exact,
            format!("{}'s attendance rate is {}.", student.name, student.attendance),
        )
        .with_confidence(ATTENDANCE_CONFIDENCE)
        .with_evidence(evidence);
    }

    if contains_any(lower, GRADE_KEYWORDS) {
        let evidence = to_evidence(&GradeEvidence {
            student_id: &student.id,
            name: &student.name,
            grade: &student.grade,
            marks: student.marks,
        });
        return BotResponse::new(
            ResponseKind::Exact,
            format!(
                "{} has achieved a grade of {} with {} marks.",
                student.name, student.grade, student.marks
            ),
        )
        .with_confidence(GRADE_CONFIDENCE)
        .with_evidence(evidence);
    }

    BotResponse::new(
        ResponseKind::Partial,
        format!(
            "I found information about {} (ID: {}):\n• Grade: {}\n• Attendance: {}\n• Marks: {}",
            student.name, student.id, student.grade, student.attendance, student.marks
        ),
    )
    .with_confidence(PARTIAL_CONFIDENCE)
    .with_evidence(to_evidence(student))
}

fn list_students(records: &[StudentRecord]) -> BotResponse {
    let lines: Vec<String> = records
        .iter()
        .map(|s| format!("• {} ({}) - Grade: {}", s.name, s.id, s.grade))
        .collect();
    BotResponse::new(
        ResponseKind::Exact,
        format!("Here are all registered students:\n{}", lines.join("\n")),
    )
    .with_confidence(LIST_CONFIDENCE)
    .with_evidence(to_evidence(&records))
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn to_evidence<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

// =============================================================================
// QueryResolver
// =============================================================================

/// Resolver bound to a record store.
#[derive(Clone, Debug, Default)]
pub struct QueryResolver {
    store: RecordStore,
}

impl QueryResolver {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn resolve(&self, query: &str) -> BotResponse {
        resolve(query, self.store.as_slice())
    }
}

// =============================================================================
// Asynchronous sources
// =============================================================================

/// Anything that can answer a query asynchronously.
///
/// The chat surface only talks to this trait, so the keyword resolver can
/// be swapped for a real retrieval backend without touching orchestration.
#[async_trait]
pub trait ResponseSource: Send + Sync {
    async fn respond(&self, query: &str) -> Result<BotResponse, ChatError>;
}

/// [`QueryResolver`] behind a randomized delay that models a network hop.
#[derive(Clone, Debug)]
pub struct SimulatedResolver {
    resolver: QueryResolver,
    min_latency: Duration,
    max_latency: Duration,
}

impl SimulatedResolver {
    pub fn new(resolver: QueryResolver, config: &ResolverConfig) -> Self {
        let min_latency = Duration::from_millis(config.min_latency_ms);
        let max_latency = Duration::from_millis(config.max_latency_ms).max(min_latency);
        Self {
            resolver,
            min_latency,
            max_latency,
        }
    }

    /// Resolver with no artificial delay.
    pub fn immediate(resolver: QueryResolver) -> Self {
        Self {
            resolver,
            min_latency: Duration::ZERO,
            max_latency: Duration::ZERO,
        }
    }

    /// Uniformly sampled delay in `[min_latency, max_latency]`.
    pub fn sample_latency(&self) -> Duration {
        if self.min_latency == self.max_latency {
            return self.min_latency;
        }
        rand::thread_rng().gen_range(self.min_latency..=self.max_latency)
    }
}

#[async_trait]
impl ResponseSource for SimulatedResolver {
    async fn respond(&self, query: &str) -> Result<BotResponse, ChatError> {
        let latency = self.sample_latency();
        tracing::debug!(latency_ms = latency.as_millis() as u64, "Simulating resolver latency");
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        Ok(self.resolver.resolve(query))
    }
}

// =============================================================================
// Tests
// =============================================================================
