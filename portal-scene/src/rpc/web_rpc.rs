use bevy::diagnostic::DiagnosticsStore;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::materials::uniforms::{MaterialKey, SetUniform, UniformError, UniformValue};
use crate::engine::systems::debug_panel::{DebugPanelCommand, DebugSnapshot};
use crate::engine::systems::fps_tracking::smoothed_fps;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC error structure following specification.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Outgoing message buffer between the debug panel and the scene.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the panel without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing the postMessage channel for iframe deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_event::<SetUniform>()
            .add_event::<DebugPanelCommand>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    let Some(window) = window() else {
        error!("Window object not available, debug panel channel disabled");
        return;
    };
    if let Err(e) =
        window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
    {
        error!("Failed to register message listener: {:?}", e);
        return;
    }

    // JS owns the closure from here on.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Messages pushed by the browser callback, drained once per frame.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Typed outcome of a request that the ECS still has to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcCommand {
    Uniform(SetUniform),
    Panel(DebugPanelCommand),
}

/// Read-only view of the scene for a batch of requests, plus the commands
/// those requests produced.
pub struct RpcContext {
    pub fps: f32,
    pub snapshot: DebugSnapshot,
    pub commands: Vec<RpcCommand>,
}

impl RpcContext {
    pub fn new(fps: f32, snapshot: DebugSnapshot) -> Self {
        Self {
            fps,
            snapshot,
            commands: Vec::new(),
        }
    }
}

fn handle_rpc_messages(world: &mut World) {
    let contents: Vec<String> = world
        .resource_mut::<Events<IncomingRpcMessage>>()
        .drain()
        .map(|event| event.content)
        .collect();
    if contents.is_empty() {
        return;
    }

    let fps = world
        .get_resource::<DiagnosticsStore>()
        .map_or(0.0, smoothed_fps);
    let mut context = RpcContext::new(fps, DebugSnapshot::capture(world));
    let mut responses = Vec::new();

    for content in contents {
        match serde_json::from_str::<RpcRequest>(&content) {
            Ok(request) => {
                if let Some(response) = handle_rpc_request(&request, &mut context) {
                    responses.push(response);
                }
            }
            Err(parse_error) => warn!("Discarding malformed RPC message: {parse_error}"),
        }
    }

    for command in context.commands {
        match command {
            RpcCommand::Uniform(set_uniform) => {
                world.send_event(set_uniform);
            }
            RpcCommand::Panel(panel_command) => {
                world.send_event(panel_command);
            }
        }
    }

    let mut rpc_interface = world.resource_mut::<WebRpcInterface>();
    for response in responses {
        rpc_interface.queue_response(response);
    }
}

/// Handle individual RPC request and generate response based on method.
///
/// Requests without an id are notifications: they still act, but get no reply.
pub fn handle_rpc_request(request: &RpcRequest, context: &mut RpcContext) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "set_uniform" => handle_set_uniform(&request.params, context),
        "set_background_color" => handle_set_background_color(&request.params, context),
        "stop_controls" => {
            context
                .commands
                .push(RpcCommand::Panel(DebugPanelCommand::StopControls));
            Ok(serde_json::json!({ "success": true }))
        }
        "set_controls_enabled" => handle_set_controls_enabled(&request.params, context),
        "get_debug_state" => serde_json::to_value(&context.snapshot)
            .map_err(|e| RpcError::internal_error(&e.to_string())),
        "get_fps" => Ok(serde_json::json!({ "fps": context.fps })),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return Some(create_error_response(
                request.id.clone()?,
                -32601,
                "Method not found",
                Some(serde_json::json!({"method": request.method})),
            ));
        }
    };

    let id = request.id.clone()?;
    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

fn handle_set_uniform(
    params: &serde_json::Value,
    context: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct SetUniformParams {
        material: String,
        name: String,
        value: serde_json::Value,
    }

    let params = serde_json::from_value::<SetUniformParams>(params.clone()).map_err(|_| {
        RpcError::invalid_params("Expected 'material', 'name' and 'value' parameters")
    })?;

    let material: MaterialKey = params
        .material
        .parse()
        .map_err(|e: UniformError| RpcError::invalid_params(&e.to_string()))?;
    let value = parse_uniform_value(&params.value)?;

    let command = SetUniform::new(material, params.name.clone(), value);
    command
        .validate()
        .map_err(|e| RpcError::invalid_params(&e.to_string()))?;
    context.commands.push(RpcCommand::Uniform(command));

    Ok(serde_json::json!({
        "success": true,
        "material": material.as_str(),
        "name": params.name
    }))
}

fn handle_set_background_color(
    params: &serde_json::Value,
    context: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct BackgroundParams {
        color: String,
    }

    let params = serde_json::from_value::<BackgroundParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'color' parameter"))?;
    let color = parse_hex_color(&params.color)?;

    context
        .commands
        .push(RpcCommand::Panel(DebugPanelCommand::SetBackgroundColor(color)));

    Ok(serde_json::json!({ "success": true, "color": params.color }))
}

fn handle_set_controls_enabled(
    params: &serde_json::Value,
    context: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct ControlsParams {
        enabled: bool,
    }

    let params = serde_json::from_value::<ControlsParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected boolean 'enabled' parameter"))?;

    context
        .commands
        .push(RpcCommand::Panel(DebugPanelCommand::SetControlsEnabled(
            params.enabled,
        )));

    Ok(serde_json::json!({ "success": true, "enabled": params.enabled }))
}

/// Numbers become scalars, strings are read as hex colours.
fn parse_uniform_value(value: &serde_json::Value) -> Result<UniformValue, RpcError> {
    match value {
        serde_json::Value::Number(number) => number
            .as_f64()
            .map(|v| UniformValue::Scalar(v as f32))
            .ok_or_else(|| RpcError::invalid_params("Uniform value is not a finite number")),
        serde_json::Value::String(hex) => parse_hex_color(hex).map(UniformValue::Color),
        _ => Err(RpcError::invalid_params(
            "Uniform value must be a number or a '#rrggbb' string",
        )),
    }
}

fn parse_hex_color(hex: &str) -> Result<Color, RpcError> {
    Srgba::hex(hex)
        .map(Color::from)
        .map_err(|e| RpcError::invalid_params(&format!("Invalid colour '{hex}': {e}")))
}

fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to the parent window hosting the panel.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}
