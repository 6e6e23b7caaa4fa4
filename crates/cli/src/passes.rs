//! Passes of the text pipeline driven by the `libpass` binary.
//!
//! `read` loads the input (normally pre-seeded by the binary), `tokenize`
//! splits it into words, `stats` counts them and provides the `summary`
//! capability, `emit` prints the tokens and `report` prints the counts.

use std::collections::BTreeSet;
use std::io::Read;
use std::sync::{Arc, OnceLock};

use libpass_core::{Pass, PassError, PassId, PassRegistry, PassResult, PassStream, PassUsage};
use serde::Serialize;
use tracing::{debug, warn};

/// Ids of the pipeline passes, in registration order.
#[derive(Debug, Clone, Copy)]
pub struct PipelineIds {
    pub read: PassId,
    pub tokenize: PassId,
    pub summary: PassId,
    pub stats: PassId,
    pub emit: PassId,
    pub report: PassId,
}

impl PipelineIds {
    pub fn all(&self) -> [PassId; 6] {
        [self.read, self.tokenize, self.summary, self.stats, self.emit, self.report]
    }
}

/// Word statistics produced by `stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub lines: usize,
    pub words: usize,
    pub chars: usize,
    pub distinct: usize,
}

/// Id a pass learns once its own registration returned.
type OwnId = Arc<OnceLock<PassId>>;

fn own_id(slot: &OwnId) -> Option<PassId> {
    slot.get().copied()
}

pub fn register_all(registry: &mut PassRegistry) -> Result<PipelineIds, PassError> {
    let read_own = OwnId::default();
    let tokenize_own = OwnId::default();
    let stats_own = OwnId::default();

    let own = Arc::clone(&read_own);
    let read = registry.register("Read", "read the input text from stdin", "read", None, move || {
        Box::new(ReadPass { own: Arc::clone(&own) }) as Box<dyn Pass>
    })?;
    read_own.get_or_init(|| read);

    let own = Arc::clone(&tokenize_own);
    let tokenize = registry.register(
        "Tokenize",
        "split the input into whitespace separated tokens",
        "tokenize",
        Some('t'),
        move || Box::new(TokenizePass { read, own: Arc::clone(&own) }) as Box<dyn Pass>,
    )?;
    tokenize_own.get_or_init(|| tokenize);

    let stats_slot = Arc::clone(&stats_own);
    let summary = registry.register(
        "Summary",
        "text statistics are available",
        "summary",
        None,
        move || {
            Box::new(SummaryPass { stats: Arc::clone(&stats_slot), present: false }) as Box<dyn Pass>
        },
    )?;

    let own = Arc::clone(&stats_own);
    let stats = registry.register(
        "Stats",
        "count lines, words and distinct tokens",
        "stats",
        Some('s'),
        move || {
            Box::new(StatsPass { read, tokenize, summary, own: Arc::clone(&own) }) as Box<dyn Pass>
        },
    )?;
    stats_own.get_or_init(|| stats);

    let emit = registry.register(
        "Emit",
        "print one token per line",
        "emit",
        Some('e'),
        move || Box::new(EmitPass { tokenize, stream: None, emitted: 0 }) as Box<dyn Pass>,
    )?;

    let report = registry.register(
        "Report",
        "print the text statistics",
        "report",
        Some('r'),
        move || Box::new(ReportPass { summary, stats, stream: None }) as Box<dyn Pass>,
    )?;

    Ok(PipelineIds { read, tokenize, summary, stats, emit, report })
}

struct ReadPass {
    own: OwnId,
}

impl Pass for ReadPass {
    fn run(&mut self, result: &mut PassResult) -> bool {
        let Some(id) = own_id(&self.own) else {
            return false;
        };
        if result.has(id) {
            debug!("Read: input already loaded");
            return true;
        }

        let mut text = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut text) {
            warn!("Read: failed to read stdin: {}", e);
            return false;
        }
        result.set(id, text);
        true
    }
}

struct TokenizePass {
    read: PassId,
    own: OwnId,
}

impl Pass for TokenizePass {
    fn usage(&self, usage: &mut PassUsage) {
        usage.require(self.read);
    }

    fn run(&mut self, result: &mut PassResult) -> bool {
        let tokens: Vec<String> = match result.get::<String>(self.read) {
            Ok(text) => text.split_whitespace().map(str::to_string).collect(),
            Err(e) => {
                warn!("Tokenize: {}", e);
                return false;
            }
        };
        debug!("Tokenize: {} tokens", tokens.len());
        match own_id(&self.own) {
            Some(id) => {
                result.set(id, tokens);
                true
            }
            None => false,
        }
    }
}

struct StatsPass {
    read: PassId,
    tokenize: PassId,
    summary: PassId,
    own: OwnId,
}

impl Pass for StatsPass {
    fn usage(&self, usage: &mut PassUsage) {
        usage.require(self.tokenize).provide(self.summary);
    }

    fn run(&mut self, result: &mut PassResult) -> bool {
        let stats = {
            let (Ok(text), Ok(tokens)) = (
                result.get::<String>(self.read),
                result.get::<Vec<String>>(self.tokenize),
            ) else {
                warn!("Stats: input or tokens missing");
                return false;
            };
            let distinct: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
            TextStats {
                lines: text.lines().count(),
                words: tokens.len(),
                chars: text.chars().count(),
                distinct: distinct.len(),
            }
        };
        match own_id(&self.own) {
            Some(id) => {
                result.set(id, stats);
                true
            }
            None => false,
        }
    }
}

/// Capability marker for `stats`; checks the statistics are in place.
struct SummaryPass {
    stats: OwnId,
    present: bool,
}

impl Pass for SummaryPass {
    fn run(&mut self, result: &mut PassResult) -> bool {
        self.present = own_id(&self.stats)
            .map(|id| result.get::<TextStats>(id).is_ok())
            .unwrap_or(false);
        true
    }

    fn verify(&mut self) -> bool {
        self.present
    }
}

struct EmitPass {
    tokenize: PassId,
    stream: Option<PassStream>,
    emitted: u64,
}

impl Pass for EmitPass {
    fn usage(&self, usage: &mut PassUsage) {
        usage.require(self.tokenize);
    }

    fn set_stream(&mut self, stream: PassStream) {
        self.stream = Some(stream);
    }

    fn run(&mut self, result: &mut PassResult) -> bool {
        let (Ok(tokens), Some(stream)) =
            (result.get::<Vec<String>>(self.tokenize), self.stream.as_ref())
        else {
            return false;
        };
        for token in tokens {
            if let Err(e) = stream.write_str(&format!("{}\n", token)) {
                warn!("Emit: {}", e);
                return false;
            }
        }
        self.emitted = tokens.len() as u64;
        true
    }

    fn changes(&self) -> u64 {
        self.emitted
    }
}

struct ReportPass {
    summary: PassId,
    stats: PassId,
    stream: Option<PassStream>,
}

impl Pass for ReportPass {
    fn usage(&self, usage: &mut PassUsage) {
        usage.require(self.summary);
    }

    fn set_stream(&mut self, stream: PassStream) {
        self.stream = Some(stream);
    }

    fn run(&mut self, result: &mut PassResult) -> bool {
        let (Ok(stats), Some(stream)) = (result.get::<TextStats>(self.stats), self.stream.as_ref())
        else {
            return false;
        };
        let text = format!(
            "lines: {}\nwords: {}\nchars: {}\ndistinct: {}\n",
            stats.lines, stats.words, stats.chars, stats.distinct
        );
        stream.write_str(&text).is_ok()
    }
}
