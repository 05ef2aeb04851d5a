use dioxus::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
}

/// Dashboard loads never fail from the view's side, so there is no error arm.
#[must_use]
pub fn view_state_from_resource<T: Clone>(resource: &Resource<T>) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(data) => ViewState::Ready(data.clone()),
            None => ViewState::Loading,
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
