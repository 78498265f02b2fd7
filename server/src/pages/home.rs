use axum::response::Response;

use crate::context::PageContext;
use crate::error::AppError;
use crate::views::HomePage;

pub async fn home(ctx: PageContext) -> Result<Response, AppError> {
    ctx.render(&HomePage {
        layout: ctx.layout(),
    })
}
