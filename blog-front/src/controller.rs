use std::time::Duration;

use blog_front_core::{DEBOUNCE_MS, IssuedQuery, SearchAction, SearchState};
use leptos::leptos_dom::helpers::{TimeoutHandle, set_timeout_with_handle};
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::AbortController;

use crate::api;
use crate::session::Session;

/// Драйвер автомата поиска: таймер debounce и отмена fetch.
///
/// Владеет ровно одним таймером и одним `AbortController`; оба
/// атомарно заменяются на каждом новом действии автомата. При
/// размонтировании таймер сбрасывается, запрос в полёте отменяется,
/// и дальнейших мутаций состояния не происходит.
#[derive(Clone, Copy)]
pub(crate) struct ListController {
    session: Session,
    state: RwSignal<SearchState>,
    debounce: StoredValue<Option<TimeoutHandle>, LocalStorage>,
    in_flight: StoredValue<Option<AbortController>, LocalStorage>,
}

impl ListController {
    /// Создаёт контроллер и сразу выдаёт первый запрос.
    pub(crate) fn new(session: Session) -> Self {
        let controller = Self {
            session,
            state: RwSignal::new(SearchState::new()),
            debounce: StoredValue::new_local(None),
            in_flight: StoredValue::new_local(None),
        };

        if let Some(action) = controller.state.try_update(SearchState::refresh) {
            controller.run(action);
        }

        on_cleanup(move || controller.dispose());
        controller
    }

    /// Реактивное состояние поиска для view-слоя.
    pub(crate) fn state(&self) -> RwSignal<SearchState> {
        self.state
    }

    pub(crate) fn on_text_input(&self, text: String) {
        if let Some(action) = self.state.try_update(|state| state.edit_text(text)) {
            self.run(action);
        }
    }

    pub(crate) fn on_category(&self, category: String) {
        if let Some(Some(action)) = self.state.try_update(|state| state.set_category(category)) {
            self.run(action);
        }
    }

    pub(crate) fn on_page(&self, page: u32) {
        if let Some(Some(action)) = self.state.try_update(|state| state.set_page(page)) {
            self.run(action);
        }
    }

    /// Ручной повтор после ошибки.
    pub(crate) fn retry(&self) {
        if let Some(action) = self.state.try_update(SearchState::refresh) {
            self.run(action);
        }
    }

    fn run(&self, action: SearchAction) {
        match action {
            SearchAction::RestartDebounce => self.restart_debounce(),
            SearchAction::Issue(issued) => self.issue(issued),
        }
    }

    fn restart_debounce(&self) {
        self.clear_debounce();
        let controller = *self;
        let handle = set_timeout_with_handle(
            move || controller.debounce_fired(),
            Duration::from_millis(DEBOUNCE_MS),
        )
        .ok();
        self.debounce.set_value(handle);
    }

    fn debounce_fired(&self) {
        self.debounce.set_value(None);
        if let Some(Some(action)) = self.state.try_update(|state| state.debounce_elapsed()) {
            self.run(action);
        }
    }

    fn issue(&self, issued: IssuedQuery) {
        // предыдущий запрос отменяется до выдачи нового
        self.abort_in_flight();

        let aborter = AbortController::new().ok();
        let signal = aborter.as_ref().map(AbortController::signal);
        self.in_flight.set_value(aborter);

        let controller = *self;
        spawn_local(async move {
            let result =
                api::search_posts(&controller.session, &issued.query, signal.as_ref()).await;
            // после teardown сигнала уже нет; try_update молча ничего не делает
            controller
                .state
                .try_update(|state| state.apply_response(issued.generation, result));
        });
    }

    fn clear_debounce(&self) {
        self.debounce.update_value(|slot| {
            if let Some(handle) = slot.take() {
                handle.clear();
            }
        });
    }

    fn abort_in_flight(&self) {
        self.in_flight.update_value(|slot| {
            if let Some(aborter) = slot.take() {
                aborter.abort();
            }
        });
    }

    fn dispose(&self) {
        self.clear_debounce();
        self.abort_in_flight();
    }
}
