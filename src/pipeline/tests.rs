//! End-to-end link resolution over real checkouts.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::{Builder, TempDir};

use super::*;
use crate::context::{Context, ContextOptions, EmitError, LinkScope};
use crate::logger::MemoryTracer;
use crate::markdown::PulldownEngine;
use crate::repository::{RepositoryInfo, RepositoryReader};
use crate::world::WorldInfo;

struct Stack {
    dir: TempDir,
}

impl Stack {
    fn new() -> Self {
        Self {
            dir: Builder::new().prefix("docstack").tempdir().unwrap(),
        }
    }

    fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    fn value(&self, rel: &str) -> PathValue {
        PathValue::from_path(&self.path(rel))
    }

    fn info(&self, name: &str) -> RepositoryInfo {
        RepositoryInfo::new(name, self.value(&format!("Stack/{name}")))
    }
}

fn world() -> WorldInfo {
    WorldInfo::new("CK", "1.0")
}

fn register(context: &mut Context, infos: Vec<RepositoryInfo>, tracer: &MemoryTracer) {
    let engine = PulldownEngine::default();
    let reader = RepositoryReader::new(&engine, tracer, &[]);
    for info in infos {
        context.register(world(), reader.read(info), tracer);
    }
}

fn document<'a>(context: &'a Context, suffix: &str) -> &'a Document {
    context
        .documents()
        .find(|d| d.local_path().to_string().ends_with(suffix))
        .unwrap()
}

#[test]
fn test_directory_link_resolves_to_index() {
    let stack = Stack::new();
    stack.write("Stack/Repo1/README.md", "# Repo1\n\n[project](./Project)\n");
    stack.write("Stack/Repo1/Project/README.md", "# Project\n");

    let tracer = MemoryTracer::new();
    let mut context = Context::new(ContextOptions::default());
    register(&mut context, vec![stack.info("Repo1")], &tracer);
    let pipeline = Pipeline::standard(PipelineOptions::default());

    // the pipeline alone stops in the virtual address space
    let registry = context.registry();
    let entry = registry.repository(&world(), "Repo1").unwrap();
    let mut readme = document(&context, "Repo1/README.md").clone();
    let address = readme.current().clone();
    let scope = LinkScope {
        registry: &registry,
        repository: entry,
        document: &address,
    };
    pipeline.run(&mut readme, &scope, &tracer);
    assert_eq!(readme.stage(), Stage::TargetDirectoryResolved);
    assert_eq!(readme.bindings()[0].current(), &PathValue::parse("~/Project/README.md"));

    context.set_output(stack.value("out"));
    context.process(&pipeline, &tracer);
    let binding = &document(&context, "Repo1/README.md").bindings()[0];
    assert_eq!(binding.current(), &PathValue::parse("Project/README.html"));
    assert_eq!(binding.href(), "Project/README.html");
    assert!(context.is_ok());
}

#[test]
fn test_escape_above_virtual_root() {
    let stack = Stack::new();
    stack.write("Stack/Repo1/README.md", "[out](../../OutsideRepo)\n");
    stack.write("Stack/Repo2/README.md", "# Repo2\n");
    stack.write("OutsideRepo/README.md", "# Outside\n");

    let tracer = MemoryTracer::new();
    let mut context = Context::new(ContextOptions::default());
    register(&mut context, vec![stack.info("Repo1"), stack.info("Repo2")], &tracer);
    context.set_output(stack.value("out"));
    context.process(&Pipeline::standard(PipelineOptions::default()), &tracer);

    let binding = &document(&context, "Repo1/README.md").bindings()[0];
    assert!(
        matches!(binding.errors(), [LinkError::AboveVirtualRoot(_)]),
        "{:?}",
        binding.errors()
    );
    assert!(!context.is_ok());

    let err = context.apply(&PulldownEngine::default(), &tracer).unwrap_err();
    match err {
        EmitError::Refused { documents } => {
            assert_eq!(documents.len(), 1);
            assert!(documents[0].ends_with("Repo1/README.md"));
        }
        other => panic!("unexpected {other}"),
    }
    assert!(!stack.path("out").exists());
}

#[test]
fn test_branch_qualified_urls() {
    let stack = Stack::new();
    stack.write(
        "Stack/Repo1/README.md",
        "\
[master](https://github.com/Org/Repo1/blob/master/Project/README.md)
[develop](https://github.com/Org/Repo1/blob/develop/Project/README.md)
[docs](https://github.com/Org/Repo2/tree/main/docs#intro)
",
    );
    stack.write("Stack/Repo1/Project/README.md", "# Project\n");
    stack.write("Stack/Repo2/docs/README.md", "# Docs\n");

    let tracer = MemoryTracer::new();
    let mut context = Context::new(ContextOptions {
        branch_aware: true,
        ..ContextOptions::default()
    });
    let infos = vec![
        stack
            .info("Repo1")
            .with_remote("https://github.com/Org/Repo1")
            .with_branch("master"),
        stack
            .info("Repo2")
            .with_remote("https://github.com/Org/Repo2")
            .with_branch("main"),
    ];
    register(&mut context, infos, &tracer);
    context.set_output(stack.value("out"));
    context.process(&Pipeline::standard(PipelineOptions::default()), &tracer);

    let readme = document(&context, "Repo1/README.md");
    let hrefs: Vec<_> = readme.bindings().iter().map(|b| b.href()).collect();
    assert_eq!(
        hrefs,
        [
            "Project/README.html",
            "https://github.com/Org/Repo1/blob/develop/Project/README.md",
            "../Repo2/docs/README.html#intro",
        ]
    );

    let develop = &readme.bindings()[1];
    assert!(develop.errors().is_empty());
    assert!(develop.infos()[0].starts_with("world: "), "{:?}", develop.infos());
    assert!(context.is_ok());
}

#[test]
fn test_error_level_blocks_resolution() {
    let stack = Stack::new();
    stack.write("Stack/Repo1/README.md", "[](Project)\n[gone](missing.md)\n");
    stack.write("Stack/Repo1/Project/README.md", "# Project\n");

    let tracer = MemoryTracer::new();
    let mut context = Context::new(ContextOptions::default());
    register(&mut context, vec![stack.info("Repo1")], &tracer);
    let pipeline = Pipeline::standard(PipelineOptions {
        check_level: CheckLevel::Error,
        ..PipelineOptions::default()
    });
    context.set_output(stack.value("out"));
    context.process(&pipeline, &tracer);

    let readme = document(&context, "Repo1/README.md");
    for binding in readme.bindings() {
        assert!(
            matches!(binding.errors(), [LinkError::Check { check: "repository", .. }]),
            "{:?}",
            binding.errors()
        );
        assert!(binding.infos().is_empty());
    }
    // no transform ran on the empty-text link
    assert_eq!(readme.bindings()[0].current(), &PathValue::parse("~/Project"));
    assert!(!context.is_ok());
}

#[test]
fn test_warn_level_records_infos() {
    let stack = Stack::new();
    stack.write("Stack/Repo1/README.md", "[gone](missing.md)\n");

    let tracer = MemoryTracer::new();
    let mut context = Context::new(ContextOptions::default());
    register(&mut context, vec![stack.info("Repo1")], &tracer);
    context.set_output(stack.value("out"));
    context.process(&Pipeline::standard(PipelineOptions::default()), &tracer);

    let binding = &document(&context, "Repo1/README.md").bindings()[0];
    assert!(binding.errors().is_empty());
    assert_eq!(binding.infos().len(), 1);
    assert!(binding.infos()[0].contains("does not exist"));
    assert_eq!(binding.href(), "missing.html");
    assert!(context.is_ok());
}

#[derive(Default)]
struct FakeChecker {
    calls: Mutex<Vec<String>>,
}

impl LinkAvailabilityChecker for FakeChecker {
    fn check_reachable(&self, url: &str) -> bool {
        self.calls.lock().push(url.to_string());
        !url.contains("dead")
    }
}

#[test]
fn test_availability_check() {
    let stack = Stack::new();
    stack.write(
        "Stack/Repo1/README.md",
        "\
[ok](https://example.com/ok)
[dead](https://example.com/dead)
[skipped](https://intranet.example.com/dead)
[internal](https://github.com/Org/Repo1/blob/master/README.md)
[mail](mailto:someone@example.com)
",
    );

    let tracer = MemoryTracer::new();
    let mut context = Context::new(ContextOptions {
        branch_aware: true,
        ..ContextOptions::default()
    });
    let info = stack
        .info("Repo1")
        .with_remote("https://github.com/Org/Repo1")
        .with_branch("master");
    register(&mut context, vec![info], &tracer);

    let checker = Arc::new(FakeChecker::default());
    let pipeline = Pipeline::standard(PipelineOptions {
        availability: Some(checker.clone()),
        skip_prefixes: vec!["https://intranet.".to_string()],
        ..PipelineOptions::default()
    });
    assert!(pipeline.describe().contains(&"availability"));

    context.set_output(stack.value("out"));
    context.process(&pipeline, &tracer);

    assert_eq!(
        *checker.calls.lock(),
        ["https://example.com/ok", "https://example.com/dead"]
    );
    let readme = document(&context, "Repo1/README.md");
    assert_eq!(
        readme.bindings()[1].infos(),
        ["availability: `https://example.com/dead` is not reachable"]
    );
    assert!(readme.bindings()[0].infos().is_empty());
    assert_eq!(readme.bindings()[3].href(), "README.html");
}

#[test]
fn test_describe_order() {
    let pipeline = Pipeline::standard(PipelineOptions::default());
    assert_eq!(
        pipeline.describe(),
        ["repository", "world", "repository-local", "cross-repository", "target-directory"]
    );
}

struct Failing;

impl Transform for Failing {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn transform(
        &self,
        current: &PathValue,
        _scope: &LinkScope<'_>,
    ) -> Result<PathValue, LinkError> {
        Err(LinkError::OutOfScope(current.to_string()))
    }
}

struct Marker;

impl Transform for Marker {
    fn name(&self) -> &'static str {
        "marker"
    }

    fn transform(
        &self,
        current: &PathValue,
        _scope: &LinkScope<'_>,
    ) -> Result<PathValue, LinkError> {
        Ok(current.append_segment("marked"))
    }
}

#[test]
fn test_transform_failure_stops_binding() {
    let stack = Stack::new();
    stack.write("Stack/Repo1/README.md", "[a](docs)\n[code](run.sh)\n");

    let tracer = MemoryTracer::new();
    let mut context = Context::new(ContextOptions::default());
    register(&mut context, vec![stack.info("Repo1")], &tracer);
    let pipeline = Pipeline::new(CheckLevel::Warn)
        .with_repository_transform(Failing)
        .with_world_transform(Marker);
    context.set_output(stack.value("out"));
    context.process(&pipeline, &tracer);

    let readme = document(&context, "Repo1/README.md");
    let docs = &readme.bindings()[0];
    assert!(matches!(docs.errors(), [LinkError::OutOfScope(_)]));
    // the world stage skipped the binding in error
    assert_eq!(docs.current(), &PathValue::parse("~/docs"));

    // code links are not transformed
    let code = &readme.bindings()[1];
    assert!(code.errors().is_empty());
    assert_eq!(code.href(), "run.sh");
}

#[test]
fn test_process_only_raw_documents() {
    let stack = Stack::new();
    stack.write("Stack/Repo1/README.md", "[a](docs)\n");

    let tracer = MemoryTracer::new();
    let mut context = Context::new(ContextOptions::default());
    register(&mut context, vec![stack.info("Repo1")], &tracer);
    let pipeline = Pipeline::new(CheckLevel::Warn).with_world_transform(Marker);
    context.set_output(stack.value("out"));

    context.process(&pipeline, &tracer);
    context.process(&pipeline, &tracer);
    let binding = &document(&context, "Repo1/README.md").bindings()[0];
    assert_eq!(binding.current(), &PathValue::parse("docs/marked"));
    assert_eq!(document(&context, "Repo1/README.md").stage(), Stage::PostProcessed);
}

#[test]
fn test_percent_encoded_targets() {
    let stack = Stack::new();
    stack.write(
        "Stack/Repo1/README.md",
        "# Repo1\n\n[guide](my%20guide.md)\n[dir](my%20dir)\n",
    );
    stack.write("Stack/Repo1/my guide.md", "# Guide\n");
    stack.write("Stack/Repo1/my dir/README.md", "# Dir\n");

    let tracer = MemoryTracer::new();
    let mut context = Context::new(ContextOptions::default());
    register(&mut context, vec![stack.info("Repo1")], &tracer);
    context.set_output(stack.value("out"));
    context.process(&Pipeline::standard(PipelineOptions::default()), &tracer);

    let readme = document(&context, "Repo1/README.md");
    assert!(readme.bindings().iter().all(|b| b.infos().is_empty()), "{readme:?}");
    assert_eq!(readme.bindings()[0].current(), &PathValue::parse("my guide.html"));
    assert_eq!(readme.bindings()[1].current(), &PathValue::parse("my dir/README.html"));
    assert!(context.is_ok());
}
