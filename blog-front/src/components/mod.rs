mod error_banner;
mod login;
mod post_detail;
mod post_form;
mod post_list;
mod register;

pub(crate) use error_banner::ErrorBanner;
pub(crate) use login::Login;
pub(crate) use post_detail::PostDetail;
pub(crate) use post_form::PostForm;
pub(crate) use post_list::PostList;
pub(crate) use register::Register;
