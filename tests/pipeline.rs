mod common;

use common::{FakeFetcher, MemoryStore, ScriptedModel, DRAFT, EXTRACTED_JOB, PORTFOLIO_CSV};
use cold_mail::portfolio::{Embedder, Portfolio, PortfolioStore, SqlitePortfolioStore};
use cold_mail::{EmailGenerator, EmailPipeline, JobInput, JobRecord, PipelineError};
use std::path::PathBuf;
use std::sync::Arc;

struct Harness {
    model: Arc<ScriptedModel>,
    fetcher: Arc<FakeFetcher>,
    store: Arc<MemoryStore>,
    pipeline: EmailPipeline,
    _dir: tempfile::TempDir,
}

fn harness(model: ScriptedModel, fetcher: FakeFetcher, store: MemoryStore) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("my_portfolio.csv");
    std::fs::write(&csv, PORTFOLIO_CSV).unwrap();

    let model = Arc::new(model);
    let fetcher = Arc::new(fetcher);
    let store = Arc::new(store);
    let pipeline = EmailPipeline::new(
        model.clone(),
        fetcher.clone(),
        Portfolio::new(store.clone(), csv),
    );

    Harness {
        model,
        fetcher,
        store,
        pipeline,
        _dir: dir,
    }
}

#[tokio::test]
async fn test_url_input_runs_every_stage() {
    let h = harness(
        ScriptedModel::new(&[EXTRACTED_JOB, DRAFT]),
        FakeFetcher::serving("Careers\nFrontend Engineer\nReact and Node.js"),
        MemoryStore::default(),
    );

    let generated = h
        .pipeline
        .generate(
            JobInput::Url("https://jobs.example.com/42".to_string()),
            &common::sender(),
        )
        .await
        .unwrap();

    assert_eq!(h.fetcher.urls(), vec!["https://jobs.example.com/42"]);
    assert_eq!(generated.job.role, "Frontend Engineer");
    assert_eq!(generated.job.skills, "React, Node.js");
    assert_eq!(
        generated.links.first().map(String::as_str),
        Some("https://example.com/react-portfolio")
    );
    assert_eq!(generated.links.len(), 2);
    assert_eq!(generated.draft.as_str(), DRAFT);

    let prompts = h.model.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("React and Node.js"));
    assert!(prompts[1].contains("https://example.com/react-portfolio"));
    assert!(prompts[1].contains("You are Mohan, a Business Development Executive at AtliQ."));
}

#[tokio::test]
async fn test_manual_input_skips_fetch_and_extraction() {
    let h = harness(
        ScriptedModel::new(&[DRAFT]),
        FakeFetcher::serving("unused"),
        MemoryStore::default(),
    );
    let job = JobRecord::new("X", "Y", "Z", "W");

    let generated = h
        .pipeline
        .generate(JobInput::Manual(job.clone()), &common::sender())
        .await
        .unwrap();

    assert_eq!(generated.job, job);
    assert!(h.fetcher.urls().is_empty());

    let prompts = h.model.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(&serde_json::to_string_pretty(&job).unwrap()));
}

#[tokio::test]
async fn test_empty_skills_never_query_store() {
    let h = harness(
        ScriptedModel::new(&[DRAFT]),
        FakeFetcher::serving("unused"),
        MemoryStore::default(),
    );

    let generated = h
        .pipeline
        .generate(
            JobInput::Manual(JobRecord::new("Role", "", "   ", "")),
            &common::sender(),
        )
        .await
        .unwrap();

    assert!(generated.links.is_empty());
    assert_eq!(h.store.query_count(), 0);
    assert!(h.model.prompts()[0].contains("(no portfolio links available)"));
}

#[tokio::test]
async fn test_bootstrap_loads_once() {
    let h = harness(
        ScriptedModel::new(&[DRAFT, DRAFT]),
        FakeFetcher::serving("unused"),
        MemoryStore::default(),
    );
    let input = JobInput::Manual(JobRecord::new("Role", "", "React", ""));

    h.pipeline.generate(input.clone(), &common::sender()).await.unwrap();
    assert_eq!(h.store.count().await.unwrap(), 3);

    h.pipeline.generate(input, &common::sender()).await.unwrap();
    assert_eq!(h.store.count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_populated_store_ignores_missing_csv() {
    let model = Arc::new(ScriptedModel::new(&[DRAFT]));
    let store = Arc::new(MemoryStore::with_entries(&[("Rust, Tokio", "https://example.com/rust")]));
    let pipeline = EmailPipeline::new(
        model,
        Arc::new(FakeFetcher::serving("unused")),
        Portfolio::new(store.clone(), PathBuf::from("/nonexistent/portfolio.csv")),
    );

    let generated = pipeline
        .generate(
            JobInput::Manual(JobRecord::new("Role", "", "Rust", "")),
            &common::sender(),
        )
        .await
        .unwrap();

    assert_eq!(generated.links, vec!["https://example.com/rust"]);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_missing_sender_fields_rejected_before_any_call() {
    let h = harness(
        ScriptedModel::new(&[DRAFT]),
        FakeFetcher::serving("unused"),
        MemoryStore::default(),
    );
    let mut sender = common::sender();
    sender.job_title = " ".to_string();

    let err = h
        .pipeline
        .generate(JobInput::Url("https://jobs.example.com".to_string()), &sender)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Validation { field: "job_title" }));
    assert!(h.model.prompts().is_empty());
    assert!(h.fetcher.urls().is_empty());
    assert_eq!(h.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_unreachable_page_is_fetch_error() {
    let h = harness(
        ScriptedModel::new(&[]),
        FakeFetcher::unreachable(),
        MemoryStore::default(),
    );

    let err = h
        .pipeline
        .generate(
            JobInput::Url("https://down.example.com".to_string()),
            &common::sender(),
        )
        .await
        .unwrap_err();

    match err {
        PipelineError::Fetch { url, reason } => {
            assert_eq!(url, "https://down.example.com");
            assert!(reason.contains("connection refused"));
        }
        other => panic!("expected fetch error, got {:?}", other),
    }
    assert!(h.model.prompts().is_empty());
}

#[tokio::test]
async fn test_prose_extraction_is_extraction_error() {
    let h = harness(
        ScriptedModel::new(&["Sorry, I could not find any job postings."]),
        FakeFetcher::serving("Just a landing page"),
        MemoryStore::default(),
    );

    let err = h
        .pipeline
        .generate(
            JobInput::Url("https://jobs.example.com".to_string()),
            &common::sender(),
        )
        .await
        .unwrap_err();

    match err {
        PipelineError::Extraction { raw_output, .. } => {
            assert!(raw_output.contains("could not find"));
        }
        other => panic!("expected extraction error, got {:?}", other),
    }
    assert_eq!(h.model.prompts().len(), 1);
}

#[tokio::test]
async fn test_model_failure_while_composing() {
    let h = harness(
        ScriptedModel::failing("429 rate limited"),
        FakeFetcher::serving("unused"),
        MemoryStore::default(),
    );

    let err = h
        .pipeline
        .generate(
            JobInput::Manual(JobRecord::new("Role", "", "Python", "")),
            &common::sender(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Model(ref reason) if reason.contains("rate limited")));
}

#[tokio::test]
async fn test_sqlite_store_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("my_portfolio.csv");
    std::fs::write(&csv, PORTFOLIO_CSV).unwrap();

    let store = Arc::new(
        SqlitePortfolioStore::open(&dir.path().join("vector_db_store"), Arc::new(Embedder::hashing()))
            .await
            .unwrap(),
    );
    let model = Arc::new(ScriptedModel::new(&[DRAFT]));
    let pipeline = EmailPipeline::new(
        model,
        Arc::new(FakeFetcher::serving("unused")),
        Portfolio::new(store.clone(), csv),
    );

    let generated = pipeline
        .generate(
            JobInput::Manual(JobRecord::new(
                "Backend Engineer",
                "5 years",
                "Python, Django",
                "APIs",
            )),
            &common::sender(),
        )
        .await
        .unwrap();

    assert_eq!(generated.links[0], "https://example.com/python-portfolio");
    assert_eq!(store.count().await.unwrap(), 3);
}
