use crate::messages::{Command, Message};
use crate::network::ApiClient;
use crate::state::dispatch_global_message;

/// Run network commands off the UI event path. The editor stays
/// interactive while the request is outstanding.
pub fn execute_network_command(cmd: Command) {
    if let Command::CreateWorkflowApi { instruction } = cmd {
        wasm_bindgen_futures::spawn_local(async move {
            match ApiClient::create_workflow(&instruction).await {
                Ok(workflow_id) => {
                    dispatch_global_message(Message::WorkflowCreated { workflow_id })
                }
                Err(e) => {
                    let error = e.as_string().unwrap_or_else(|| format!("{:?}", e));
                    web_sys::console::error_1(
                        &format!("Failed to create workflow: {}", error).into(),
                    );
                    dispatch_global_message(Message::ExecutionFailed { error });
                }
            }
        });
    }
}
