//! Command form builder.

use std::collections::BTreeMap;

use syscon_core::{AppError, AppResult};
use syscon_domain::{FieldDescriptor, InputKind, OperationDescriptor, find_operation};

/// One rendered input and its current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    descriptor: &'static FieldDescriptor,
    value: String,
}

impl FormField {
    /// Returns the parameter name.
    #[must_use]
    pub fn field_id(&self) -> &'static str {
        self.descriptor.field_id
    }

    /// Returns the label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.descriptor.label
    }

    /// Returns the input kind.
    #[must_use]
    pub fn input_kind(&self) -> InputKind {
        self.descriptor.input_kind
    }

    /// Returns the placeholder.
    #[must_use]
    pub fn placeholder(&self) -> &'static str {
        self.descriptor.placeholder
    }

    /// Returns whether the field must be filled.
    #[must_use]
    pub fn required(&self) -> bool {
        self.descriptor.required
    }

    /// Returns the current value.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }
}

/// Parameter inputs for the selected operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandForm {
    operation: Option<&'static OperationDescriptor>,
    fields: Vec<FormField>,
}

impl CommandForm {
    /// Creates a form already built for one operation.
    #[must_use]
    pub fn for_operation(operation_name: &str) -> Self {
        let mut form = Self::default();
        form.build_form(operation_name);
        form
    }

    /// Replaces every input with the fields declared by the operation.
    ///
    /// Unknown or empty names produce an empty form. Previous values are
    /// always discarded, even when the same operation is selected again.
    pub fn build_form(&mut self, operation_name: &str) {
        self.operation = find_operation(operation_name.trim());
        self.fields = self
            .operation
            .map(|operation| {
                operation
                    .fields
                    .iter()
                    .map(|descriptor| FormField {
                        descriptor,
                        value: String::new(),
                    })
                    .collect()
            })
            .unwrap_or_default();
    }

    /// Removes the selection and every input.
    pub fn clear(&mut self) {
        self.operation = None;
        self.fields.clear();
    }

    /// Returns the selected operation.
    #[must_use]
    pub fn operation(&self) -> Option<&'static OperationDescriptor> {
        self.operation
    }

    /// Returns the rendered inputs in declared order.
    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Sets the value of a rendered input.
    pub fn set_value(&mut self, field_id: &str, value: impl Into<String>) -> AppResult<()> {
        let operation_name = self.operation.map_or("", |operation| operation.name);
        let field = self
            .fields
            .iter_mut()
            .find(|field| field.field_id() == field_id)
            .ok_or_else(|| {
                if operation_name.is_empty() {
                    AppError::Validation("select an operation first".to_owned())
                } else {
                    AppError::Validation(format!(
                        "operation '{operation_name}' has no field '{field_id}'"
                    ))
                }
            })?;

        field.value = value.into();
        Ok(())
    }

    /// Returns the current values keyed by field id.
    #[must_use]
    pub fn values(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .map(|field| (field.field_id().to_owned(), field.value.clone()))
            .collect()
    }
}
