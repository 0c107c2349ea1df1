//! Submission forms: proposal submission, user creation.
//!
//! A failed submit returns to `Editing` with the draft intact, so input is
//! never lost.

use std::future::Future;
use std::marker::PhantomData;

use thiserror::Error;

use crate::api::ApiError;
use crate::model::Validate;
use crate::mvi::{Intent, Reducer, UiState};

#[derive(Debug, Clone, PartialEq)]
pub enum FormState<D> {
    Editing { draft: D, error: Option<String> },
    Submitting { draft: D },
    Submitted,
}

impl<D: Default> Default for FormState<D> {
    fn default() -> Self {
        FormState::Editing {
            draft: D::default(),
            error: None,
        }
    }
}

impl<D: Clone + PartialEq + Default + Send + 'static> UiState for FormState<D> {}

impl<D> FormState<D> {
    pub fn draft(&self) -> Option<&D> {
        match self {
            FormState::Editing { draft, .. } | FormState::Submitting { draft } => Some(draft),
            FormState::Submitted => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FormState::Editing { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, FormState::Submitting { .. })
    }
}

#[derive(Debug, Clone)]
pub enum FormIntent<D> {
    /// Replace the draft with the user's latest input.
    Edit(D),
    /// Validate and move to `Submitting`.
    Submit,
    Succeeded,
    Failed { message: String },
    /// Start over with an empty draft.
    Reset,
}

impl<D: Send + 'static> Intent for FormIntent<D> {}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Required fields missing: {}", .fields.join(", "))]
    Missing { fields: Vec<&'static str> },

    #[error("Form is not editable")]
    NotEditing,

    #[error("{}", .0.user_message())]
    Rejected(#[source] ApiError),
}

impl FormError {
    pub fn error_type(&self) -> &'static str {
        match self {
            FormError::Missing { .. } => "validation_error",
            FormError::NotEditing => "invalid_state",
            FormError::Rejected(e) => e.error_type(),
        }
    }
}

pub struct FormReducer<D>(PhantomData<fn() -> D>);

impl<D> Reducer for FormReducer<D>
where
    D: Validate + Clone + PartialEq + Default + Send + 'static,
{
    type State = FormState<D>;
    type Intent = FormIntent<D>;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            FormIntent::Edit(draft) => match state {
                FormState::Editing { .. } => FormState::Editing { draft, error: None },
                other => other,
            },

            FormIntent::Submit => match state {
                FormState::Editing { draft, .. } => {
                    let missing = draft.missing_fields();
                    if missing.is_empty() {
                        FormState::Submitting { draft }
                    } else {
                        let error = FormError::Missing { fields: missing }.to_string();
                        FormState::Editing {
                            draft,
                            error: Some(error),
                        }
                    }
                }
                other => other,
            },

            FormIntent::Succeeded => match state {
                FormState::Submitting { .. } => FormState::Submitted,
                other => other,
            },

            FormIntent::Failed { message } => match state {
                FormState::Submitting { draft } => FormState::Editing {
                    draft,
                    error: Some(message),
                },
                other => other,
            },

            FormIntent::Reset => FormState::default(),
        }
    }
}

/// A form bound to its reducer.
#[derive(Debug, Clone, Default)]
pub struct Form<D> {
    state: FormState<D>,
}

impl<D> Form<D>
where
    D: Validate + Clone + PartialEq + Default + Send + 'static,
{
    pub fn new(draft: D) -> Self {
        Self {
            state: FormState::Editing { draft, error: None },
        }
    }

    pub fn state(&self) -> &FormState<D> {
        &self.state
    }

    pub fn dispatch(&mut self, intent: FormIntent<D>) {
        self.state = FormReducer::<D>::reduce(std::mem::take(&mut self.state), intent);
    }

    pub fn edit(&mut self, draft: D) {
        self.dispatch(FormIntent::Edit(draft));
    }

    /// Validate locally, then hand the draft to `send`.
    ///
    /// Nothing is sent when validation fails. On a remote failure the form
    /// is back in `Editing` with the server's message.
    pub async fn submit<R, F, Fut>(&mut self, send: F) -> Result<R, FormError>
    where
        F: FnOnce(D) -> Fut,
        Fut: Future<Output = Result<R, ApiError>>,
    {
        if !matches!(self.state, FormState::Editing { .. }) {
            return Err(FormError::NotEditing);
        }
        self.dispatch(FormIntent::Submit);
        let draft = match &self.state {
            FormState::Submitting { draft } => draft.clone(),
            FormState::Editing { draft, .. } => {
                return Err(FormError::Missing {
                    fields: draft.missing_fields(),
                })
            }
            FormState::Submitted => return Err(FormError::NotEditing),
        };

        match send(draft).await {
            Ok(created) => {
                self.dispatch(FormIntent::Succeeded);
                Ok(created)
            }
            Err(e) => {
                tracing::warn!(error_type = e.error_type(), error = %e, "Submission failed");
                self.dispatch(FormIntent::Failed {
                    message: e.user_message(),
                });
                Err(FormError::Rejected(e))
            }
        }
    }
}
