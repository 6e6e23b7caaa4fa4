//! End-to-end tests driving a small expression pipeline through the manager.
//!
//! `Source` is seeded through the default result, `Tokenize` splits it,
//! `Evaluate` sums the numbers and `Print` writes the total to the stream.

use std::collections::BTreeMap;
use std::sync::Arc;

use libpass_manager::{
    Pass, PassDescriptor, PassError, PassId, PassLookup, PassManager, PassRegistry, PassResult,
    PassStream, PassUsage,
};

struct SourcePass;

impl Pass for SourcePass {
    fn run(&mut self, _result: &mut PassResult) -> bool {
        // the source must come from the seeded default result
        false
    }
}

struct TokenizePass {
    source: PassId,
    own: PassId,
}

impl Pass for TokenizePass {
    fn usage(&self, usage: &mut PassUsage) {
        usage.require(self.source);
    }

    fn run(&mut self, result: &mut PassResult) -> bool {
        let tokens: Vec<String> = match result.get::<String>(self.source) {
            Ok(text) => text.split_whitespace().map(|t| t.to_string()).collect(),
            Err(_) => return false,
        };
        result.set(self.own, tokens);
        true
    }
}

struct EvaluatePass {
    tokens: PassId,
    own: PassId,
    count: u64,
}

impl Pass for EvaluatePass {
    fn usage(&self, usage: &mut PassUsage) {
        usage.require(self.tokens);
    }

    fn run(&mut self, result: &mut PassResult) -> bool {
        let mut total = 0i64;
        match result.get::<Vec<String>>(self.tokens) {
            Ok(tokens) => {
                for token in tokens {
                    match token.parse::<i64>() {
                        Ok(n) => total += n,
                        Err(_) => return false,
                    }
                }
                self.count = tokens.len() as u64;
            }
            Err(_) => return false,
        }
        result.set(self.own, total);
        true
    }

    fn changes(&self) -> u64 {
        self.count
    }
}

struct PrintPass {
    value: PassId,
    stream: Option<PassStream>,
}

impl Pass for PrintPass {
    fn usage(&self, usage: &mut PassUsage) {
        usage.require(self.value);
    }

    fn set_stream(&mut self, stream: PassStream) {
        self.stream = Some(stream);
    }

    fn run(&mut self, result: &mut PassResult) -> bool {
        let (Ok(total), Some(stream)) = (result.get::<i64>(self.value), &self.stream) else {
            return false;
        };
        stream.write_str(&format!("total = {}\n", total)).is_ok()
    }
}

struct Pipeline {
    registry: Arc<PassRegistry>,
    source: PassId,
    tokenize: PassId,
    evaluate: PassId,
    print: PassId,
}

fn pipeline() -> Pipeline {
    let mut registry = PassRegistry::new();
    PassManager::register(&mut registry).unwrap();

    let source = registry
        .register("Source", "input text", "source", None, || {
            Box::new(SourcePass) as Box<dyn Pass>
        })
        .unwrap();
    // ids are allocated in registration order
    let tokenize = PassId::new(source.as_u32() + 1);
    let evaluate = PassId::new(source.as_u32() + 2);
    let print = PassId::new(source.as_u32() + 3);

    assert_eq!(
        registry
            .register("Tokenize", "split input", "tokenize", Some('t'), move || {
                Box::new(TokenizePass { source, own: tokenize }) as Box<dyn Pass>
            })
            .unwrap(),
        tokenize
    );
    assert_eq!(
        registry
            .register("Evaluate", "sum tokens", "evaluate", Some('e'), move || {
                Box::new(EvaluatePass { tokens: tokenize, own: evaluate, count: 0 }) as Box<dyn Pass>
            })
            .unwrap(),
        evaluate
    );
    assert_eq!(
        registry
            .register("Print", "print total", "print", Some('p'), move || {
                Box::new(PrintPass { value: evaluate, stream: None }) as Box<dyn Pass>
            })
            .unwrap(),
        print
    );

    Pipeline {
        registry: Arc::new(registry),
        source,
        tokenize,
        evaluate,
        print,
    }
}

fn manager_for(p: &Pipeline) -> PassManager {
    let mut manager = PassManager::new(p.registry.clone()).unwrap();
    for id in [p.source, p.tokenize, p.evaluate, p.print] {
        manager.add(id).unwrap();
    }
    manager
}

#[test]
fn seeded_source_flows_through_pipeline() {
    let p = pipeline();
    let mut manager = manager_for(&p);
    let (stream, buffer) = PassStream::buffer();
    manager.set_stream(stream);

    let mut seed = PassResult::new();
    seed.set(p.source, "1 2 3 4".to_string());
    manager.set_default_result(seed);
    p.registry.select_arg("print").unwrap();

    assert!(manager.run().unwrap());
    assert_eq!(manager.schedule(), &[p.source, p.tokenize, p.evaluate, p.print]);
    assert_eq!(*manager.result().get::<i64>(p.evaluate).unwrap(), 10);
    assert_eq!(buffer.contents(), "total = 10\n");
    assert_eq!(p.registry.pass_info(p.evaluate).unwrap().changes(), 4);
    assert_eq!(manager.metrics().passes_skipped, 1);
}

#[test]
fn missing_seed_fails_at_source() {
    let p = pipeline();
    let mut manager = manager_for(&p);
    manager.set_stream(PassStream::buffer().0);
    manager.set_default_pass(p.evaluate);

    assert!(!manager.run().unwrap());
    assert!(manager.result().is_empty());
    assert_eq!(manager.metrics().passes_failed["Source"], 1);
}

#[test]
fn bad_token_keeps_partial_results() {
    let p = pipeline();
    let mut manager = manager_for(&p);
    manager.set_stream(PassStream::buffer().0);

    let mut seed = PassResult::new();
    seed.set(p.source, "1 two 3".to_string());
    manager.set_default_result(seed);
    manager.set_default_pass(p.print);

    assert!(!manager.run().unwrap());
    assert_eq!(manager.result().get::<Vec<String>>(p.tokenize).unwrap().len(), 3);
    assert!(!manager.result().has(p.evaluate));

    let result = manager.into_result();
    assert!(result.has(p.source));
}

#[test]
fn dump_lists_requirements() {
    let p = pipeline();
    let mut manager = manager_for(&p);
    let (stream, buffer) = PassStream::buffer();
    manager.set_stream(stream);
    p.registry.select_arg("pm-dump").unwrap();

    assert!(manager.run().unwrap());
    let dump = buffer.contents();
    assert!(dump.starts_with("PassManager\n\nSource\n\nTokenize\n    <-- Source\n\n"));
    assert!(dump.ends_with("Print\n    <-- Evaluate\n\n"));
}

/// Hand-built registry standing in for [`PassRegistry`].
struct FakeRegistry {
    passes: BTreeMap<PassId, Arc<PassDescriptor>>,
}

impl PassLookup for FakeRegistry {
    fn pass_info(&self, id: PassId) -> Result<Arc<PassDescriptor>, PassError> {
        self.passes.get(&id).cloned().ok_or(PassError::UnknownPass(id))
    }

    fn find(&self, arg: &str) -> Option<PassId> {
        self.passes
            .values()
            .find(|d| d.arg_string() == arg)
            .map(|d| d.id())
    }
}

struct StorePass(PassId, i64);

impl Pass for StorePass {
    fn run(&mut self, result: &mut PassResult) -> bool {
        result.set(self.0, self.1);
        true
    }
}

#[test]
fn manager_accepts_custom_lookup() {
    let manager_id = PassId::new(100);
    let answer = PassId::new(200);

    let mut passes = BTreeMap::new();
    passes.insert(
        manager_id,
        Arc::new(PassDescriptor::new(
            manager_id,
            "PassManager",
            "dump",
            "pm-dump",
            None,
            Box::new(|| Box::new(libpass_manager::ManagerPass) as Box<dyn Pass>),
            None,
        )),
    );
    let descriptor = Arc::new(PassDescriptor::new(
        answer,
        "Answer",
        "stores 42",
        "answer",
        None,
        Box::new(move || Box::new(StorePass(answer, 42)) as Box<dyn Pass>),
        None,
    ));
    descriptor.set_selected(true);
    passes.insert(answer, descriptor);

    let mut manager = PassManager::new(Arc::new(FakeRegistry { passes })).unwrap();
    assert_eq!(manager.id(), manager_id);
    manager.add(answer).unwrap();

    assert!(manager.run().unwrap());
    assert_eq!(*manager.result().get::<i64>(answer).unwrap(), 42);
}
