use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bridge_codec::encode_tagged_error;
use bridge_kernel::{Agent, AgentConfig, BridgeError, NativeBoundary, ToolDispatcher, ToolRegistry};
use bridge_primitives::{
    AgentHandle, HandlerResult, ParameterSchema, ToolFault, ToolId, ToolSpec,
};
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, PartialEq, Eq)]
enum BoundaryCall {
    CreateAgent { name: String, model: String },
    RegisterTool { name: String, tool_id: u64, schema_json: String },
    SendPrompt { prompt: String },
}

/// Scripted stand-in for the native runtime: answers from canned replies and
/// records every crossing.
struct ScriptedBoundary {
    calls: Mutex<Vec<BoundaryCall>>,
    crossings: AtomicUsize,
    create_reply: String,
    register_replies: Mutex<Vec<String>>,
    prompt_reply: String,
}

impl ScriptedBoundary {
    fn new(create_reply: &str, register_replies: &[&str], prompt_reply: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            crossings: AtomicUsize::new(0),
            create_reply: create_reply.to_owned(),
            register_replies: Mutex::new(
                register_replies.iter().rev().map(|&r| r.to_owned()).collect(),
            ),
            prompt_reply: prompt_reply.to_owned(),
        })
    }

    fn record(&self, call: BoundaryCall) {
        self.crossings.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().expect("boundary poisoned").push(call);
    }

    fn calls(&self) -> Vec<BoundaryCall> {
        self.calls.lock().expect("boundary poisoned").clone()
    }

    fn crossings(&self) -> usize {
        self.crossings.load(Ordering::SeqCst)
    }
}

impl NativeBoundary for ScriptedBoundary {
    fn create_agent(
        &self,
        name: &str,
        model: &str,
        _api_key: &str,
        _base_url: &str,
        _preamble: &str,
    ) -> String {
        self.record(BoundaryCall::CreateAgent {
            name: name.to_owned(),
            model: model.to_owned(),
        });
        self.create_reply.clone()
    }

    fn register_tool(
        &self,
        _handle: &AgentHandle,
        name: &str,
        _description: &str,
        schema_json: &str,
        tool_id: ToolId,
    ) -> String {
        self.record(BoundaryCall::RegisterTool {
            name: name.to_owned(),
            tool_id: tool_id.get(),
            schema_json: schema_json.to_owned(),
        });
        self.register_replies
            .lock()
            .expect("boundary poisoned")
            .pop()
            .unwrap_or_else(|| "OK".to_owned())
    }

    fn send_prompt(&self, _handle: &AgentHandle, prompt: &str) -> String {
        self.record(BoundaryCall::SendPrompt {
            prompt: prompt.to_owned(),
        });
        self.prompt_reply.clone()
    }
}

fn calculator(args: &Map<String, Value>) -> HandlerResult {
    let operation = args
        .get("operation")
        .and_then(Value::as_str)
        .ok_or_else(|| ToolFault::new("missing operation"))?;
    let a = args
        .get("a")
        .and_then(Value::as_i64)
        .ok_or_else(|| ToolFault::new("missing operand a"))?;
    let b = args
        .get("b")
        .and_then(Value::as_i64)
        .ok_or_else(|| ToolFault::new("missing operand b"))?;

    let result = match operation {
        "add" => a + b,
        "subtract" => a - b,
        other => return Err(ToolFault::new(format!("unsupported operation: {other}"))),
    };

    Ok(json!({"operation": operation, "a": a, "b": b, "result": result}))
}

fn weather(args: &Map<String, Value>) -> HandlerResult {
    let city = args
        .get("city")
        .and_then(Value::as_str)
        .ok_or_else(|| ToolFault::new("missing city"))?;
    Ok(json!({"city": city, "forecast": "sunny", "temperature_c": 21}))
}

fn calculator_spec() -> ToolSpec {
    let schema = ParameterSchema::object()
        .required_property("operation", "string", "One of add or subtract")
        .unwrap()
        .required_property("a", "number", "First operand")
        .unwrap()
        .required_property("b", "number", "Second operand")
        .unwrap()
        .build();
    ToolSpec::new("calculator", "Performs basic arithmetic", schema, calculator).unwrap()
}

fn weather_spec() -> ToolSpec {
    let schema = ParameterSchema::object()
        .required_property("city", "string", "City to look up")
        .unwrap()
        .build();
    ToolSpec::new("weather", "Reports the current weather", schema, weather).unwrap()
}

fn two_tool_agent(boundary: Arc<ScriptedBoundary>, registry: Arc<ToolRegistry>) -> Agent {
    let config = AgentConfig::builder("assistant", "deepseek-chat")
        .credentials("test-key", "https://api.example.com/v1")
        .preamble("You are a helpful assistant.")
        .tool(calculator_spec())
        .tool(weather_spec())
        .build()
        .unwrap();
    Agent::new(config, registry, boundary)
}

#[test]
fn initialize_registers_tools_in_configured_order() {
    let boundary = ScriptedBoundary::new("agent_1", &[], "unused");
    let registry = Arc::new(ToolRegistry::new());
    let mut agent = two_tool_agent(Arc::clone(&boundary), Arc::clone(&registry));

    agent.initialize().unwrap();

    assert!(agent.is_initialized());
    assert_eq!(agent.handle().unwrap().as_str(), "agent_1");
    assert_eq!(registry.len(), 2);

    let calls = boundary.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls[0],
        BoundaryCall::CreateAgent {
            name: "assistant".to_owned(),
            model: "deepseek-chat".to_owned(),
        }
    );

    let BoundaryCall::RegisterTool { name: first_name, tool_id: first_id, schema_json } =
        &calls[1]
    else {
        panic!("expected a tool registration, got {:?}", calls[1]);
    };
    assert_eq!(first_name, "calculator");
    assert_eq!(*first_id, 1);
    let schema: Value = serde_json::from_str(schema_json).unwrap();
    assert_eq!(schema["type"], "object");
    assert_eq!(schema["properties"]["a"]["type"], "number");

    let BoundaryCall::RegisterTool { name: second_name, tool_id: second_id, .. } = &calls[2]
    else {
        panic!("expected a tool registration, got {:?}", calls[2]);
    };
    assert_eq!(second_name, "weather");
    assert_eq!(*second_id, 2);
    assert!(second_id > first_id);
}

#[test]
fn prompt_before_initialize_crosses_no_boundary() {
    let boundary = ScriptedBoundary::new("agent_1", &[], "unused");
    let registry = Arc::new(ToolRegistry::new());
    let agent = two_tool_agent(Arc::clone(&boundary), registry);

    let err = agent.prompt("hello").expect_err("prompt should fail");
    assert!(matches!(err, BridgeError::NotInitialized));
    assert_eq!(boundary.crossings(), 0);
}

#[test]
fn rejected_creation_surfaces_message_and_leaves_handle_unset() {
    let boundary = ScriptedBoundary::new(&encode_tagged_error("bad key"), &[], "unused");
    let registry = Arc::new(ToolRegistry::new());
    let mut agent = two_tool_agent(Arc::clone(&boundary), Arc::clone(&registry));

    let err = agent.initialize().expect_err("creation should fail");
    match err {
        BridgeError::ConfigurationRejected { message } => assert_eq!(message, "bad key"),
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(!agent.is_initialized());
    assert!(registry.is_empty());
    // Creation was the only crossing; no registration was attempted.
    assert_eq!(boundary.crossings(), 1);
}

#[test]
fn registration_failure_aborts_remaining_tools() {
    let boundary = ScriptedBoundary::new("agent_1", &["OK", "duplicate name"], "unused");
    let registry = Arc::new(ToolRegistry::new());
    let config = AgentConfig::builder("assistant", "deepseek-chat")
        .tool(calculator_spec())
        .tool(weather_spec())
        .tool(calculator_spec())
        .build()
        .unwrap();
    let mut agent = Agent::new(
        config,
        Arc::clone(&registry),
        Arc::clone(&boundary) as Arc<dyn NativeBoundary>,
    );

    let err = agent.initialize().expect_err("second registration should fail");
    match err {
        BridgeError::ToolRegistrationFailed { tool, message } => {
            assert_eq!(tool, "weather");
            assert_eq!(message, "duplicate name");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // Create + two registrations; the third tool never crossed.
    assert_eq!(boundary.crossings(), 3);
    // No rollback: both attempted tools keep their registry entries.
    assert_eq!(registry.len(), 2);
    assert!(!agent.is_initialized());
}

#[test]
fn identifiers_are_not_reused_across_agents() {
    let registry = Arc::new(ToolRegistry::new());

    let first_boundary = ScriptedBoundary::new("agent_1", &[], "unused");
    let config = AgentConfig::builder("first", "deepseek-chat")
        .tool(calculator_spec())
        .build()
        .unwrap();
    let mut first = Agent::new(config, Arc::clone(&registry), first_boundary);
    first.initialize().unwrap();
    drop(first);

    let second_boundary = ScriptedBoundary::new("agent_2", &[], "unused");
    let config = AgentConfig::builder("second", "deepseek-chat")
        .tool(weather_spec())
        .build()
        .unwrap();
    let mut second = Agent::new(
        config,
        Arc::clone(&registry),
        Arc::clone(&second_boundary) as Arc<dyn NativeBoundary>,
    );
    second.initialize().unwrap();

    let calls = second_boundary.calls();
    let BoundaryCall::RegisterTool { tool_id, .. } = &calls[1] else {
        panic!("expected a tool registration, got {:?}", calls[1]);
    };
    assert_eq!(*tool_id, 2);
    assert_eq!(registry.len(), 2);
}

#[test]
fn second_initialize_is_rejected_without_crossing() {
    let boundary = ScriptedBoundary::new("agent_1", &[], "unused");
    let registry = Arc::new(ToolRegistry::new());
    let mut agent = two_tool_agent(Arc::clone(&boundary), registry);

    agent.initialize().unwrap();
    let crossings = boundary.crossings();

    let err = agent.initialize().expect_err("reinitialization should fail");
    assert!(matches!(err, BridgeError::AlreadyInitialized));
    assert_eq!(boundary.crossings(), crossings);
}

#[test]
fn prompt_round_trip_returns_response_text() {
    let boundary = ScriptedBoundary::new("agent_1", &[], "2 + 3 is 5.");
    let registry = Arc::new(ToolRegistry::new());
    let mut agent = two_tool_agent(Arc::clone(&boundary), registry);

    agent.initialize().unwrap();
    let response = agent.prompt("What is 2 + 3?").unwrap();
    assert_eq!(response, "2 + 3 is 5.");

    let calls = boundary.calls();
    assert_eq!(
        calls.last(),
        Some(&BoundaryCall::SendPrompt {
            prompt: "What is 2 + 3?".to_owned(),
        })
    );
}

#[test]
fn rejected_prompt_surfaces_message() {
    let boundary = ScriptedBoundary::new("agent_1", &[], &encode_tagged_error("no credit"));
    let registry = Arc::new(ToolRegistry::new());
    let mut agent = two_tool_agent(Arc::clone(&boundary), registry);

    agent.initialize().unwrap();
    let err = agent.prompt("hello").expect_err("prompt should be rejected");
    match err {
        BridgeError::PromptRejected { message } => assert_eq!(message, "no credit"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn native_callback_reaches_registered_handler() {
    let boundary = ScriptedBoundary::new("agent_1", &[], "done");
    let registry = Arc::new(ToolRegistry::new());
    let mut agent = two_tool_agent(boundary, Arc::clone(&registry));
    agent.initialize().unwrap();

    // The native runtime would invoke the dispatcher with the identifier it
    // received during registration.
    let dispatcher = ToolDispatcher::new(registry);
    let output = dispatcher.dispatch(ToolId::new(1), r#"{"operation":"add","a":2,"b":3}"#);
    let parsed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed, json!({"operation": "add", "a": 2, "b": 3, "result": 5}));

    let weather_output = dispatcher.dispatch(ToolId::new(2), r#"{"city":"Lisbon"}"#);
    let parsed: Value = serde_json::from_str(&weather_output).unwrap();
    assert_eq!(parsed["city"], "Lisbon");
}

#[test]
fn callbacks_dispatch_while_other_agents_are_being_configured() {
    let registry = Arc::new(ToolRegistry::new());
    let boundary = ScriptedBoundary::new("agent_1", &[], "done");
    let config = AgentConfig::builder("first", "deepseek-chat")
        .tool(calculator_spec())
        .build()
        .unwrap();
    let mut agent = Agent::new(config, Arc::clone(&registry), boundary);
    agent.initialize().unwrap();

    let dispatcher = ToolDispatcher::new(Arc::clone(&registry));

    let callback_thread = std::thread::spawn(move || {
        for _ in 0..200 {
            let output = dispatcher.dispatch(ToolId::new(1), r#"{"operation":"add","a":1,"b":1}"#);
            let parsed: Value = serde_json::from_str(&output).unwrap();
            assert_eq!(parsed["result"], 2);
        }
    });

    let config_thread = {
        let registry = Arc::clone(&registry);
        std::thread::spawn(move || {
            for index in 0..50 {
                let boundary = ScriptedBoundary::new(&format!("agent_{}", index + 2), &[], "done");
                let config = AgentConfig::builder(format!("agent-{index}"), "deepseek-chat")
                    .tool(weather_spec())
                    .build()
                    .unwrap();
                let mut agent = Agent::new(config, Arc::clone(&registry), boundary);
                agent.initialize().unwrap();
            }
        })
    };

    callback_thread.join().expect("callback thread panicked");
    config_thread.join().expect("config thread panicked");
    assert_eq!(registry.len(), 51);
}
