use super::domain::ContactFormData;
use super::validation::{validate_step, FormStep, ValidationErrors, TOTAL_STEPS};

/// Finite state machine over the ordered wizard steps.
///
/// Forward navigation is gated by validation of the current step. Backward
/// and direct jumps (the review step's "edit" affordance) are always
/// allowed and never re-validate.
#[derive(Debug, Default)]
pub struct StepNavigator {
    current: usize,
    errors: ValidationErrors,
}

impl StepNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> FormStep {
        FormStep::from_index(self.current).expect("current index stays in range")
    }

    pub fn is_final(&self) -> bool {
        self.current == TOTAL_STEPS - 1
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Validate the current step and advance on success. Returns `true`
    /// when the step changed. A no-op at the final step.
    pub fn next(&mut self, form: &ContactFormData) -> bool {
        let errors = validate_step(self.current_step(), form);
        if !errors.is_empty() {
            self.errors = errors;
            return false;
        }

        self.errors.clear();
        if self.current < TOTAL_STEPS - 1 {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Step back, clearing error state. Never validates; floor is step 0.
    pub fn previous(&mut self) -> bool {
        self.errors.clear();
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Direct transition used from the review step. Clears error state;
    /// intermediate steps are not validated.
    pub fn jump_to(&mut self, step: FormStep) {
        self.errors.clear();
        self.current = step.index();
    }

    /// The caller clears a field's error as the user edits that field.
    pub fn clear_field_error(&mut self, field: &str) {
        self.errors.remove(field);
    }
}
