mod article_detail;
mod article_list;
mod info_page;

pub use article_detail::ArticleDetailView;
pub use article_list::ArticleListView;
pub use info_page::{InfoPage, InfoPageView};
