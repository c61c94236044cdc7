use crate::error::ApiError;
use crate::models::{Post, PostPage};

/// Размер страницы списка постов; сервер принимает его как `pageSize`.
pub const PAGE_SIZE: u32 = 5;

/// Окно тишины debounce для строки поиска, миллисекунды.
pub const DEBOUNCE_MS: u64 = 300;

/// Фаза автомата поиска.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// Ещё не было ни одного запроса.
    Idle,
    /// Идёт окно тишины после ввода текста.
    Debouncing,
    /// Запрос в полёте.
    Loading,
    /// Показан результат последнего запроса.
    Loaded,
    /// Последний запрос завершился ошибкой.
    Errored,
}

/// Параметры одного запроса списка постов.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    /// Закоммиченный (debounced) текст поиска.
    pub text: String,
    /// Фильтр по категории; пустая строка — без фильтра.
    pub category: String,
    /// Номер страницы, с 1.
    pub page: u32,
}

impl PostQuery {
    /// Query-параметры запроса.
    ///
    /// Непустой обрезанный текст уходит как `q`, непустая категория —
    /// как `category`; `page` и `pageSize` присутствуют всегда.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(4);
        let text = self.text.trim();
        if !text.is_empty() {
            params.push(("q", text.to_string()));
        }
        if !self.category.is_empty() {
            params.push(("category", self.category.clone()));
        }
        params.push(("page", self.page.to_string()));
        params.push(("pageSize", PAGE_SIZE.to_string()));
        params
    }
}

/// Запрос, помеченный значением счётчика поколений на момент выдачи.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedQuery {
    /// Метка поколения; ответ применяется, только если она всё ещё текущая.
    pub generation: u64,
    /// Сами параметры запроса.
    pub query: PostQuery,
}

/// Действие, которое драйвер обязан выполнить после события.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    /// Перезапустить таймер debounce (старый — сбросить).
    RestartDebounce,
    /// Отменить предыдущий запрос в полёте и отправить этот.
    Issue(IssuedQuery),
}

/// Судьба пришедшего ответа.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// Ответ текущего поколения, состояние обновлено.
    Applied,
    /// Устаревший или отменённый ответ, молча отброшен.
    Discarded,
}

/// Конечный автомат поиска/пагинации списка постов.
///
/// Владеет текстом поиска, фильтром категории и номером страницы,
/// метит каждый выданный запрос счётчиком поколений и применяет
/// только ответ самого последнего запроса: более ранние ответы,
/// пришедшие позже, не могут откатить видимое состояние.
///
/// Автомат чистый: таймеры и сеть он описывает возвращаемыми
/// [`SearchAction`], исполняет их драйвер.
#[derive(Debug, Clone)]
pub struct SearchState {
    raw_text: String,
    debounced_text: String,
    category: String,
    page: u32,
    generation: u64,
    phase: SearchPhase,
    // куда вернуться, если окно тишины закончилось без изменений
    settled: SearchPhase,
    items: Vec<Post>,
    total: u64,
    total_pages: u32,
    error: Option<String>,
}

impl SearchState {
    /// Пустое состояние: без фильтров, первая страница, ни одного запроса.
    pub fn new() -> Self {
        Self {
            raw_text: String::new(),
            debounced_text: String::new(),
            category: String::new(),
            page: 1,
            generation: 0,
            phase: SearchPhase::Idle,
            settled: SearchPhase::Idle,
            items: Vec::new(),
            total: 0,
            total_pages: 1,
            error: None,
        }
    }

    /// Текст в поле ввода (ещё не обязательно закоммиченный).
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Текущая категория-фильтр.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Текущая страница.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Текущая фаза автомата.
    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Посты последнего применённого ответа.
    pub fn items(&self) -> &[Post] {
        &self.items
    }

    /// Общее число результатов.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Общее число страниц.
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Текст ошибки текущего поколения, если оно завершилось неудачей.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Запрос в полёте?
    pub fn is_loading(&self) -> bool {
        self.phase == SearchPhase::Loading
    }

    /// Доступна ли кнопка «назад».
    pub fn can_prev(&self) -> bool {
        self.page > 1 && !self.is_loading()
    }

    /// Доступна ли кнопка «вперёд».
    pub fn can_next(&self) -> bool {
        self.page < self.total_pages && !self.is_loading()
    }

    /// Параметры запроса для текущего состояния.
    pub fn query(&self) -> PostQuery {
        PostQuery {
            text: self.debounced_text.clone(),
            category: self.category.clone(),
            page: self.page,
        }
    }

    /// Изменение текста в поле поиска.
    ///
    /// Каждый ввод перезапускает окно тишины; сетевой запрос отсюда
    /// не уходит никогда.
    pub fn edit_text(&mut self, text: impl Into<String>) -> SearchAction {
        self.raw_text = text.into();
        if self.phase != SearchPhase::Debouncing {
            self.settled = self.phase;
            self.phase = SearchPhase::Debouncing;
        }
        SearchAction::RestartDebounce
    }

    /// Окно тишины истекло без новых вводов.
    ///
    /// Коммитит текст и выдаёт запрос с первой страницы; если текст
    /// успел вернуться к уже закоммиченному значению — ничего.
    pub fn debounce_elapsed(&mut self) -> Option<SearchAction> {
        if self.phase == SearchPhase::Debouncing {
            self.phase = self.settled;
        }
        if self.raw_text == self.debounced_text {
            return None;
        }
        self.debounced_text = self.raw_text.clone();
        self.page = 1;
        Some(self.issue())
    }

    /// Смена фильтра категории; сбрасывает страницу на первую.
    pub fn set_category(&mut self, category: impl Into<String>) -> Option<SearchAction> {
        let category = category.into();
        if category == self.category {
            return None;
        }
        self.category = category;
        self.page = 1;
        Some(self.issue())
    }

    /// Переход на другую страницу текущей выборки.
    pub fn set_page(&mut self, page: u32) -> Option<SearchAction> {
        let page = page.max(1);
        if page == self.page {
            return None;
        }
        self.page = page;
        Some(self.issue())
    }

    /// Повторная выдача текущего запроса: первая загрузка и ручной retry.
    pub fn refresh(&mut self) -> SearchAction {
        self.issue()
    }

    fn issue(&mut self) -> SearchAction {
        self.generation += 1;
        self.error = None;
        self.settle(SearchPhase::Loading);
        SearchAction::Issue(IssuedQuery {
            generation: self.generation,
            query: self.query(),
        })
    }

    // Во время окна тишины видимая фаза остаётся Debouncing,
    // новая фаза запоминается как точка возврата.
    fn settle(&mut self, phase: SearchPhase) {
        if self.phase == SearchPhase::Debouncing {
            self.settled = phase;
        } else {
            self.phase = phase;
        }
    }

    /// Применяет ответ, если он принадлежит текущему поколению.
    ///
    /// Устаревшие ответы и отменённые запросы отбрасываются без
    /// какой-либо мутации состояния: ошибка отмены никогда не видна
    /// пользователю.
    pub fn apply_response(
        &mut self,
        generation: u64,
        result: Result<PostPage, ApiError>,
    ) -> ResponseOutcome {
        if generation != self.generation {
            tracing::debug!(
                stale = generation,
                current = self.generation,
                "discarding superseded search response"
            );
            return ResponseOutcome::Discarded;
        }
        match result {
            Ok(page) => {
                self.items = page.items;
                self.total = page.total;
                self.total_pages = page.total_pages.max(1);
                self.error = None;
                self.settle(SearchPhase::Loaded);
                ResponseOutcome::Applied
            }
            Err(err) if err.is_cancelled() => {
                tracing::debug!("search request cancelled");
                ResponseOutcome::Discarded
            }
            Err(err) => {
                self.error = Some(err.to_string());
                self.settle(SearchPhase::Errored);
                ResponseOutcome::Applied
            }
        }
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Post;

    fn post(id: i64, title: &str) -> Post {
        Post {
            id,
            title: title.to_string(),
            author: "ann".to_string(),
            category: None,
            content: String::new(),
            extra: None,
            image: None,
            created_at: None,
        }
    }

    fn page_with(items: Vec<Post>, total: u64, total_pages: u32) -> PostPage {
        PostPage {
            items,
            page: 1,
            page_size: PAGE_SIZE,
            total,
            total_pages,
        }
    }

    fn issued(action: SearchAction) -> IssuedQuery {
        match action {
            SearchAction::Issue(issued) => issued,
            other => panic!("expected Issue, got {other:?}"),
        }
    }

    #[test]
    fn rapid_edits_issue_at_most_one_query() {
        let mut state = SearchState::new();

        assert_eq!(state.edit_text("c"), SearchAction::RestartDebounce);
        assert_eq!(state.edit_text("ca"), SearchAction::RestartDebounce);
        assert_eq!(state.edit_text("cats"), SearchAction::RestartDebounce);
        assert_eq!(state.phase(), SearchPhase::Debouncing);

        // только истёкшее окно тишины коммитит текст и шлёт запрос
        let issued = issued(state.debounce_elapsed().expect("text changed, must issue"));
        assert_eq!(issued.query.text, "cats");
        assert_eq!(issued.query.page, 1);
        assert_eq!(state.phase(), SearchPhase::Loading);
    }

    #[test]
    fn debounce_without_change_issues_nothing() {
        let mut state = SearchState::new();
        state.edit_text("x");
        state.edit_text("");
        assert_eq!(state.debounce_elapsed(), None);
        assert_eq!(state.phase(), SearchPhase::Idle);
    }

    #[test]
    fn newer_response_wins_regardless_of_arrival_order() {
        let mut state = SearchState::new();
        state.edit_text("a");
        let first = issued(state.debounce_elapsed().expect("must issue"));
        state.edit_text("ab");
        let second = issued(state.debounce_elapsed().expect("must issue"));
        assert!(second.generation > first.generation);

        // ответ второго запроса приходит раньше
        let newer = page_with(vec![post(2, "newer")], 1, 1);
        assert_eq!(
            state.apply_response(second.generation, Ok(newer)),
            ResponseOutcome::Applied
        );

        // запоздавший ответ первого отбрасывается молча
        let older = page_with(vec![post(1, "older")], 1, 1);
        assert_eq!(
            state.apply_response(first.generation, Ok(older)),
            ResponseOutcome::Discarded
        );
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.items()[0].title, "newer");
        assert_eq!(state.phase(), SearchPhase::Loaded);
    }

    #[test]
    fn stale_error_does_not_touch_state() {
        let mut state = SearchState::new();
        state.edit_text("a");
        let first = issued(state.debounce_elapsed().expect("must issue"));
        state.edit_text("ab");
        let second = issued(state.debounce_elapsed().expect("must issue"));

        assert_eq!(
            state.apply_response(first.generation, Err(ApiError::Network("down".into()))),
            ResponseOutcome::Discarded
        );
        assert_eq!(state.error(), None);
        assert_eq!(state.phase(), SearchPhase::Loading);

        state.apply_response(second.generation, Ok(page_with(vec![], 0, 1)));
        assert_eq!(state.phase(), SearchPhase::Loaded);
    }

    #[test]
    fn cancellation_never_sets_an_error() {
        let mut state = SearchState::new();
        let issued_query = issued(state.refresh());

        assert_eq!(
            state.apply_response(issued_query.generation, Err(ApiError::Cancelled)),
            ResponseOutcome::Discarded
        );
        assert_eq!(state.error(), None);
        assert_ne!(state.phase(), SearchPhase::Errored);
    }

    #[test]
    fn genuine_failure_of_current_generation_surfaces() {
        let mut state = SearchState::new();
        let issued_query = issued(state.refresh());

        state.apply_response(
            issued_query.generation,
            Err(ApiError::Http {
                status: 400,
                message: "Invalid • title required".to_string(),
            }),
        );
        assert_eq!(state.phase(), SearchPhase::Errored);
        assert_eq!(state.error(), Some("Invalid • title required"));

        // следующее событие выдаёт свежий запрос и снимает ошибку
        let retry = issued(state.refresh());
        assert!(retry.generation > issued_query.generation);
        assert_eq!(state.error(), None);
        assert_eq!(state.phase(), SearchPhase::Loading);
    }

    #[test]
    fn category_and_text_changes_reset_page() {
        let mut state = SearchState::new();
        state.refresh();
        state.apply_response(1, Ok(page_with(vec![], 20, 4)));

        let to_page3 = issued(state.set_page(3).expect("page change must issue"));
        assert_eq!(to_page3.query.page, 3);

        let by_category = issued(state.set_category("rust").expect("category change must issue"));
        assert_eq!(by_category.query.page, 1);
        assert_eq!(by_category.query.category, "rust");

        state.apply_response(by_category.generation, Ok(page_with(vec![], 20, 4)));
        state.set_page(2).expect("page change must issue");
        state.edit_text("query");
        let by_text = issued(state.debounce_elapsed().expect("text change must issue"));
        assert_eq!(by_text.query.page, 1);
        assert_eq!(by_text.query.text, "query");
    }

    #[test]
    fn unchanged_category_or_page_issues_nothing() {
        let mut state = SearchState::new();
        assert_eq!(state.set_category(""), None);
        assert_eq!(state.set_page(1), None);
        // страница ниже первой прижимается к первой
        assert_eq!(state.set_page(0), None);
    }

    #[test]
    fn two_item_page_loads_with_navigation_disabled() {
        let mut state = SearchState::new();
        state.edit_text("cats");
        let issued_query = issued(state.debounce_elapsed().expect("must issue"));
        assert_eq!(
            issued_query.query.params(),
            vec![
                ("q", "cats".to_string()),
                ("page", "1".to_string()),
                ("pageSize", PAGE_SIZE.to_string()),
            ]
        );

        let page = page_with(vec![post(1, "A"), post(2, "B")], 2, 1);
        state.apply_response(issued_query.generation, Ok(page));

        assert_eq!(state.phase(), SearchPhase::Loaded);
        assert_eq!(state.items().len(), 2);
        assert_eq!(state.total(), 2);
        assert!(!state.can_prev());
        assert!(!state.can_next());
    }

    #[test]
    fn params_include_category_and_trim_text() {
        let query = PostQuery {
            text: "  cats  ".to_string(),
            category: "news".to_string(),
            page: 2,
        };
        assert_eq!(
            query.params(),
            vec![
                ("q", "cats".to_string()),
                ("category", "news".to_string()),
                ("page", "2".to_string()),
                ("pageSize", PAGE_SIZE.to_string()),
            ]
        );

        let blank = PostQuery {
            text: "   ".to_string(),
            category: String::new(),
            page: 1,
        };
        assert_eq!(
            blank.params(),
            vec![
                ("page", "1".to_string()),
                ("pageSize", PAGE_SIZE.to_string()),
            ]
        );
    }

    #[test]
    fn response_arriving_mid_debounce_keeps_debouncing_visible() {
        let mut state = SearchState::new();
        let issued_query = issued(state.refresh());

        // пользователь начал печатать, пока запрос в полёте
        state.edit_text("new text");
        assert_eq!(state.phase(), SearchPhase::Debouncing);

        state.apply_response(issued_query.generation, Ok(page_with(vec![], 0, 1)));
        // данные закоммичены, но окно тишины ещё идёт
        assert_eq!(state.phase(), SearchPhase::Debouncing);

        let follow_up = state.debounce_elapsed().expect("text changed, must issue");
        assert!(matches!(follow_up, SearchAction::Issue(_)));
    }

    #[test]
    fn navigation_disabled_while_loading() {
        let mut state = SearchState::new();
        state.refresh();
        state.apply_response(1, Ok(page_with(vec![], 20, 4)));
        state.set_page(2).expect("must issue");
        assert!(state.is_loading());
        assert!(!state.can_prev());
        assert!(!state.can_next());
    }
}
