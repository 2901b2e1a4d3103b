//! Property tests for turn dispatch
//!
//! Drives a session through random sequences of successful turns, failed
//! turns and resets, checking transcript growth and handle lifecycle after
//! every step.

use super::{handle_user_message, DispatchError};
use crate::agent::testing::{AgentCall, MockAgentClient};
use crate::agent::{AgentError, ConversationResponse};
use crate::session::{ConversationHandle, Role, SessionState};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Succeed { text: String, reply: String },
    Fail { text: String },
    Reset,
}

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ?!]{0,24}[a-zA-Z0-9]"
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (arb_text(), "[a-z ]{0,16}").prop_map(|(text, reply)| Step::Succeed { text, reply }),
        2 => arb_text().prop_map(|text| Step::Fail { text }),
        1 => Just(Step::Reset),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn prop_turns_preserve_transcript_and_handle_invariants(
        steps in proptest::collection::vec(arb_step(), 1..20)
    ) {
        let rt = runtime();
        let client = MockAgentClient::new();
        let mut state = SessionState::new();
        let mut conversations = 0usize;

        for step in steps {
            let before_len = state.transcript().len();
            let before_handle = state.handle().cloned();
            let before_handle_absent = before_handle.is_none();

            match step {
                Step::Succeed { text, reply } => {
                    conversations += 1;
                    let id = format!("conv_{conversations}");
                    client.queue_response(ConversationResponse::text(&id, &reply));

                    let turn = rt
                        .block_on(handle_user_message(&mut state, &client, "ag", &text))
                        .unwrap();

                    prop_assert_eq!(state.transcript().len(), before_len + 2);
                    prop_assert_eq!(&turn.reply, &reply);
                    let last = state.transcript().last().unwrap();
                    prop_assert_eq!(last.role, Role::Assistant);
                    prop_assert_eq!(&last.content, &reply);

                    match before_handle {
                        None => {
                            prop_assert!(turn.started);
                            prop_assert_eq!(
                                state.handle().map(ConversationHandle::as_str),
                                Some(id.as_str())
                            );
                        }
                        Some(handle) => {
                            prop_assert!(!turn.started);
                            prop_assert_eq!(state.handle(), Some(&handle));
                        }
                    }
                }
                Step::Fail { text } => {
                    client.queue_error(AgentError::network("unreachable"));

                    let err = rt
                        .block_on(handle_user_message(&mut state, &client, "ag", &text))
                        .unwrap_err();

                    prop_assert!(matches!(err, DispatchError::RemoteCallFailed(_)));
                    prop_assert_eq!(state.transcript().len(), before_len + 1);
                    prop_assert_eq!(state.transcript().last().unwrap().role, Role::User);
                    prop_assert_eq!(state.handle().cloned(), before_handle);
                }
                Step::Reset => {
                    state.reset();
                    prop_assert_eq!(state.transcript().len(), 1);
                    prop_assert!(state.handle().is_none());
                    continue;
                }
            }

            // Start iff the session had no handle going into the turn
            let last_call = client.recorded_calls().pop().unwrap();
            prop_assert_eq!(
                matches!(last_call, AgentCall::Start { .. }),
                before_handle_absent
            );
        }
    }
}

