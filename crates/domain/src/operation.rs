use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use syscon_core::Role;

/// Access class of a simulated system call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationClass {
    /// Visible to every role.
    Read,
    /// Write or delete class, visible to admins only.
    Write,
}

impl OperationClass {
    /// Returns stable label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

/// Kind of input rendered for a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// Single-line text.
    Text,
    /// Integer input, still sent as its original text.
    Number,
    /// Multi-line text.
    TextArea,
    /// Local file path whose contents are uploaded.
    File,
}

impl InputKind {
    /// Returns stable label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::TextArea => "textarea",
            Self::File => "file",
        }
    }
}

/// Static definition of one input field of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Parameter name sent to the backend.
    pub field_id: &'static str,
    /// Human label.
    pub label: &'static str,
    /// Input kind.
    pub input_kind: InputKind,
    /// Example value shown in an empty input.
    pub placeholder: &'static str,
    /// Whether the field must be filled before sending.
    pub required: bool,
}

/// Static definition of a simulated system call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor {
    /// Stable operation name, also the endpoint suffix.
    pub name: &'static str,
    /// One-line description for the catalog.
    pub description: &'static str,
    /// Access class.
    pub class: OperationClass,
    /// Input fields in display order.
    pub fields: &'static [FieldDescriptor],
}

impl OperationDescriptor {
    /// Returns whether the role may see and run this operation.
    #[must_use]
    pub fn permits(&self, role: Role) -> bool {
        match self.class {
            OperationClass::Read => true,
            OperationClass::Write => role.can_write(),
        }
    }

    /// Returns the backend path for this operation.
    #[must_use]
    pub fn endpoint_path(&self) -> String {
        format!("/syscall/{}", self.name)
    }

    /// Finds a declared field by id.
    #[must_use]
    pub fn field(&self, field_id: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|field| field.field_id == field_id)
    }
}

const FILENAME: FieldDescriptor = FieldDescriptor {
    field_id: "filename",
    label: "Filename",
    input_kind: InputKind::Text,
    placeholder: "e.g., /tmp/test.txt",
    required: true,
};

const FILE_DESCRIPTOR: FieldDescriptor = FieldDescriptor {
    field_id: "fd",
    label: "File Descriptor",
    input_kind: InputKind::Number,
    placeholder: "e.g., 3",
    required: true,
};

const SIZE: FieldDescriptor = FieldDescriptor {
    field_id: "size",
    label: "Size",
    input_kind: InputKind::Number,
    placeholder: "e.g., 1024",
    required: true,
};

const CONTENT: FieldDescriptor = FieldDescriptor {
    field_id: "content",
    label: "Content",
    input_kind: InputKind::TextArea,
    placeholder: "Content to write",
    required: true,
};

const UPLOAD: FieldDescriptor = FieldDescriptor {
    field_id: "content",
    label: "File to upload",
    input_kind: InputKind::File,
    placeholder: "path to a local file",
    required: true,
};

/// Every operation the console supports, in menu order.
pub const OPERATIONS: &[OperationDescriptor] = &[
    OperationDescriptor {
        name: "open",
        description: "Open a file and return a descriptor",
        class: OperationClass::Read,
        fields: &[FILENAME],
    },
    OperationDescriptor {
        name: "read",
        description: "Read bytes from an open descriptor",
        class: OperationClass::Read,
        fields: &[FILE_DESCRIPTOR, SIZE],
    },
    OperationDescriptor {
        name: "write",
        description: "Write content to an open descriptor",
        class: OperationClass::Write,
        fields: &[FILE_DESCRIPTOR, CONTENT],
    },
    OperationDescriptor {
        name: "close",
        description: "Close an open descriptor",
        class: OperationClass::Read,
        fields: &[FILE_DESCRIPTOR],
    },
    OperationDescriptor {
        name: "stat",
        description: "Show file metadata",
        class: OperationClass::Read,
        fields: &[FILENAME],
    },
    OperationDescriptor {
        name: "getpid",
        description: "Return the process identifier",
        class: OperationClass::Read,
        fields: &[],
    },
    OperationDescriptor {
        name: "read_file",
        description: "Read the shared sample file",
        class: OperationClass::Read,
        fields: &[],
    },
    OperationDescriptor {
        name: "write_file",
        description: "Replace the shared sample file with an uploaded file",
        class: OperationClass::Write,
        fields: &[UPLOAD],
    },
    OperationDescriptor {
        name: "delete_file",
        description: "Delete the shared sample file",
        class: OperationClass::Write,
        fields: &[],
    },
];

/// Looks up an operation by name.
#[must_use]
pub fn find_operation(name: &str) -> Option<&'static OperationDescriptor> {
    OPERATIONS.iter().find(|operation| operation.name == name)
}

/// Returns the operations the role may see, in menu order.
#[must_use]
pub fn operations_for_role(role: Role) -> Vec<&'static OperationDescriptor> {
    OPERATIONS
        .iter()
        .filter(|operation| operation.permits(role))
        .collect()
}

/// One operation invocation ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    /// Operation name.
    pub operation: &'static str,
    /// Parameter bag keyed by field id.
    pub params: BTreeMap<String, String>,
}

impl CommandRequest {
    /// Returns the JSON body for the backend.
    #[must_use]
    pub fn body(&self) -> Value {
        let params = self
            .params
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect::<Map<String, Value>>();
        Value::Object(params)
    }
}

/// Catalog row served by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyscallSummary {
    /// Operation name.
    pub name: String,
    /// Backend-provided description.
    #[serde(default)]
    pub description: String,
}
