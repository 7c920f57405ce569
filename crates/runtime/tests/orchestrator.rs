//! End-to-end conversation tests against a scripted completion service.

use runtime::{
    Completion, CompletionRequest, CompletionService, ConversationConfig, Error, FOLLOW_UP,
    Message, Orchestrator, Result, Role, Strictness,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tools::{ParamKind, ParamSpec, ToolBuilder, ToolDescriptor, ToolError};

/// Replays canned replies and records every request it receives.
#[derive(Default)]
struct Scripted {
    replies: Mutex<VecDeque<Result<Completion>>>,
    requests: Mutex<Vec<(Vec<Message>, f64)>>,
}

impl Scripted {
    fn replying(replies: &[&str]) -> Self {
        let scripted = Self::default();
        for reply in replies {
            scripted.push(Ok(Completion::text(*reply)));
        }
        scripted
    }

    fn push(&self, reply: Result<Completion>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    fn requests(&self) -> Vec<(Vec<Message>, f64)> {
        self.requests.lock().unwrap().clone()
    }
}

impl CompletionService for Scripted {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<Completion> {
        self.requests
            .lock()
            .unwrap()
            .push((request.messages.to_vec(), request.temperature));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::InvalidResponse("script exhausted".into())))
    }
}

fn sum_two(calls: Arc<AtomicUsize>) -> ToolBuilder {
    ToolDescriptor::builder("sum_two")
        .doc("Adds two numbers together.\n\nArgs:\n    a (int): First addend.\n    b (int): Second addend.")
        .param(ParamSpec::new("a", ParamKind::Integer))
        .param(ParamSpec::new("b", ParamKind::Integer))
        .handler(move |args| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ToolError>(args.get::<i64>("a")? + args.get::<i64>("b")?)
        })
}

fn orchestrator(service: &Arc<Scripted>, calls: &Arc<AtomicUsize>) -> Orchestrator<Arc<Scripted>> {
    let mut orchestrator = Orchestrator::new(Arc::clone(service));
    orchestrator.register(sum_two(Arc::clone(calls))).unwrap();
    orchestrator
}

const SUM_CALL: &str = "```json\n{\"tool_name\":\"sum_two\",\"parameters\":{\"a\":4,\"b\":5}}\n```";

#[tokio::test]
async fn tool_call_round_trip() {
    let service = Arc::new(Scripted::replying(&[SUM_CALL, "4 plus 5 is 9."]));
    let calls = Arc::new(AtomicUsize::new(0));
    let orchestrator = orchestrator(&service, &calls);

    let answer = orchestrator.run("what's 4 plus 5").await.unwrap();

    assert_eq!(answer, "4 plus 5 is 9.");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let requests = service.requests();
    assert_eq!(requests.len(), 2);

    let (first, first_temperature) = &requests[0];
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].role, Role::System);
    assert!(first[0].content.contains("\"tool_name\": \"sum_two\""));
    assert!(first[0].content.contains("First addend."));
    assert_eq!(first[1], Message::user("what's 4 plus 5"));
    assert_eq!(*first_temperature, 0.1);

    let (second, second_temperature) = &requests[1];
    assert_eq!(
        second[2..],
        [
            Message::assistant(SUM_CALL),
            Message::tool("9"),
            Message::user(FOLLOW_UP),
        ]
    );
    assert_eq!(*second_temperature, 0.7);
}

#[tokio::test]
async fn plain_answer_is_returned_verbatim() {
    let service = Arc::new(Scripted::replying(&["Paris is the capital of France."]));
    let calls = Arc::new(AtomicUsize::new(0));
    let orchestrator = orchestrator(&service, &calls);

    let answer = orchestrator.run("what is the capital of France").await.unwrap();

    assert_eq!(answer, "Paris is the capital of France.");
    assert_eq!(service.requests().len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_call_falls_back_to_direct_answer() {
    let malformed = "```json\n{\"tool_name\": \"sum_two\", \"parameters\": {\"a\": 4,}}\n```";
    let service = Arc::new(Scripted::replying(&[malformed]));
    let calls = Arc::new(AtomicUsize::new(0));
    let orchestrator = orchestrator(&service, &calls);

    let answer = orchestrator.run("what's 4 plus 5").await.unwrap();

    assert_eq!(answer, malformed);
    assert_eq!(service.requests().len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_tool_falls_back_to_direct_answer() {
    let reply = "{\"tool_name\": \"launch_rockets\", \"parameters\": {}}";
    let service = Arc::new(Scripted::replying(&[reply]));
    let calls = Arc::new(AtomicUsize::new(0));
    let orchestrator = orchestrator(&service, &calls);

    let exchange = orchestrator.run_traced("go").await.unwrap();

    assert_eq!(exchange.reply, reply);
    assert!(exchange.tool_call.is_none());
    assert_eq!(service.requests().len(), 1);
}

#[tokio::test]
async fn failing_tool_is_reported_to_the_model() {
    let service = Arc::new(Scripted::replying(&[
        "{\"tool_name\": \"divide\", \"parameters\": {\"a\": 1, \"b\": 0}}",
        "I can't divide by zero.",
    ]));
    let mut orchestrator = Orchestrator::new(Arc::clone(&service));
    orchestrator
        .register(
            ToolDescriptor::builder("divide")
                .param(ParamSpec::new("a", ParamKind::Integer))
                .param(ParamSpec::new("b", ParamKind::Integer))
                .handler(|args| {
                    let b: i64 = args.get("b")?;
                    if b == 0 {
                        return Err(ToolError::Execution("division by zero".into()));
                    }
                    Ok(args.get::<i64>("a")? / b)
                }),
        )
        .unwrap();

    let exchange = orchestrator.run_traced("1 / 0?").await.unwrap();

    assert_eq!(exchange.reply, "I can't divide by zero.");
    let record = exchange.tool_call.unwrap();
    assert!(record.failed);
    assert_eq!(record.output, "Error executing tool: division by zero");

    let requests = service.requests();
    let tool_turn = requests[1].0.iter().find(|m| m.role == Role::Tool).unwrap();
    assert_eq!(tool_turn.content, "Error executing tool: division by zero");
}

#[tokio::test]
async fn parameter_mismatch_is_reported_to_the_model() {
    let service = Arc::new(Scripted::replying(&[
        "{\"tool_name\": \"sum_two\", \"parameters\": {\"a\": 4}}",
        "I need both numbers.",
    ]));
    let calls = Arc::new(AtomicUsize::new(0));
    let orchestrator = orchestrator(&service, &calls);

    let exchange = orchestrator.run_traced("4 plus what?").await.unwrap();

    assert_eq!(exchange.reply, "I need both numbers.");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    let record = exchange.tool_call.unwrap();
    assert!(record.failed);
    assert!(record.output.contains("missing required argument 'b'"));
}

#[tokio::test]
async fn strict_policy_requires_parameters() {
    let service = Arc::new(Scripted::replying(&["{\"tool_name\": \"sum_two\"}"]));
    let calls = Arc::new(AtomicUsize::new(0));
    let orchestrator = orchestrator(&service, &calls)
        .with_config(ConversationConfig {
            strictness: Strictness::Strict,
            ..Default::default()
        })
        .unwrap();

    let answer = orchestrator.run("add").await.unwrap();

    assert_eq!(answer, "{\"tool_name\": \"sum_two\"}");
    assert_eq!(service.requests().len(), 1);
}

#[tokio::test]
async fn service_failure_propagates() {
    let service = Arc::new(Scripted::default());
    service.push(Err(Error::ServiceUnavailable("connection refused".into())));
    let calls = Arc::new(AtomicUsize::new(0));
    let orchestrator = orchestrator(&service, &calls);

    let err = orchestrator.run("hello").await.unwrap_err();
    assert!(matches!(err, Error::ServiceUnavailable(_)));
}

#[tokio::test]
async fn second_call_failure_propagates_after_tool_ran() {
    let service = Arc::new(Scripted::replying(&[SUM_CALL]));
    service.push(Err(Error::Service {
        status: 500,
        body: "boom".into(),
    }));
    let calls = Arc::new(AtomicUsize::new(0));
    let orchestrator = orchestrator(&service, &calls);

    let err = orchestrator.run("what's 4 plus 5").await.unwrap_err();
    assert!(err.is_service_error());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn runs_are_independent() {
    let service = Arc::new(Scripted::replying(&["first", "second"]));
    let calls = Arc::new(AtomicUsize::new(0));
    let orchestrator = orchestrator(&service, &calls);

    orchestrator.run("one").await.unwrap();
    orchestrator.run("two").await.unwrap();

    let requests = service.requests();
    assert_eq!(requests[1].0.len(), 2);
    assert_eq!(requests[1].0[1], Message::user("two"));
}

#[tokio::test]
async fn concurrent_runs_share_the_registry() {
    let service = Arc::new(Scripted::replying(&["a", "b", "c", "d"]));
    let calls = Arc::new(AtomicUsize::new(0));
    let orchestrator = Arc::new(orchestrator(&service, &calls));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move { orchestrator.run(&format!("question {i}")).await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }
    assert_eq!(service.requests().len(), 4);
}
