// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Response types answering the RPC surface's [`crate::query::Query`] entries.

use lcm_core::command::CommandId;
use lcm_core::job::{JobDescriptor, JobId};
use lcm_core::object::ObjectKey;
use serde::{Deserialize, Serialize};

/// The states one object could reach, keyed by the object requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectTransitions {
    pub object: ObjectKey,
    pub states: Vec<String>,
}

/// The job descriptors available against one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectJobs {
    pub object: ObjectKey,
    pub jobs: Vec<JobDescriptor>,
}

/// Read and write locks held on one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectLocks {
    pub read: Vec<JobId>,
    pub write: Vec<JobId>,
}

/// One planned job, described for display without ever being persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionConsequence {
    pub class_name: String,
    pub description: String,
    pub stateful_object: ObjectKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionConsequences {
    pub transition_job: TransitionConsequence,
    pub dependency_jobs: Vec<TransitionConsequence>,
}

/// Response types answering a [`crate::query::Query`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    AvailableTransitions { results: Vec<ObjectTransitions> },
    AvailableJobs { results: Vec<ObjectJobs> },
    Locks { locks: ObjectLocks },
    /// `None` when the target is already at (or already expected to reach)
    /// the requested state — nothing would be planned.
    TransitionConsequences { consequences: Option<TransitionConsequences> },
    CommandCreated { command_id: CommandId },
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_round_trips_through_json() {
        let response = Response::Locks { locks: ObjectLocks { read: vec![JobId::new(1)], write: vec![] } };
        let json = serde_json::to_string(&response).expect("serializable");
        let back: Response = serde_json::from_str(&json).expect("deserializable");
        assert_eq!(response, back);
    }

    #[test]
    fn transition_consequences_may_be_absent() {
        let response = Response::TransitionConsequences { consequences: None };
        let json = serde_json::to_value(&response).expect("serializable");
        assert_eq!(json["consequences"], serde_json::Value::Null);
    }
}
