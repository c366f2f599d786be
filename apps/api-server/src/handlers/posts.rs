//! Post, like and comment handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use postboard_core::domain::{Comment, Content, Post};
use postboard_core::DomainError;
use postboard_shared::SuccessResponse;
use postboard_shared::dto::{
    CommentResponse, ContentRequest, LikeResponse, MessageResponse, PostResponse,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn comment_response(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        user: comment.user,
        text: comment.text,
        name: comment.name,
        avatar: comment.avatar,
        date: comment.date,
    }
}

fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        user: post.user,
        text: post.text,
        name: post.name,
        avatar: post.avatar,
        likes: post
            .likes
            .into_iter()
            .map(|like| LikeResponse { user: like.user })
            .collect(),
        comments: post.comments.into_iter().map(comment_response).collect(),
        date: post.date,
    }
}

/// Request body to domain content; the display name defaults to the one in the token.
fn content(body: ContentRequest, identity: &Identity) -> Content {
    Content {
        text: body.text,
        name: body.name.or_else(|| identity.name.clone()),
        avatar: body.avatar,
    }
}

/// GET /api/posts/test
pub async fn probe() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse {
        msg: "Posts works".to_string(),
    })
}

/// GET /api/posts
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = match state.posts.list_all().await {
        Ok(posts) => posts,
        Err(DomainError::StoreUnavailable(msg)) if state.legacy_list_not_found => {
            tracing::error!("Listing posts failed: {}", msg);
            return Err(AppError::NotFound {
                code: "nopostsfound",
                detail: "No posts found".to_string(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let body: Vec<PostResponse> = posts.into_iter().map(post_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .get_by_id(path.into_inner())
        .await
        .map_err(|e| AppError::from(e).not_found_as("nopostfound", "No post found with that ID"))?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ContentRequest>,
) -> AppResult<HttpResponse> {
    let content = content(body.into_inner(), &identity);
    let post = state.posts.create(identity.user_id, content).await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(path.into_inner(), identity.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
}

/// POST /api/posts/like/{id}
pub async fn like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .like(path.into_inner(), identity.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// POST /api/posts/unlike/{id}
pub async fn unlike(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .unlike(path.into_inner(), identity.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// POST /api/posts/comment/{id}
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<ContentRequest>,
) -> AppResult<HttpResponse> {
    let content = content(body.into_inner(), &identity);
    let post = state
        .posts
        .add_comment(path.into_inner(), identity.user_id, content)
        .await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// DELETE /api/posts/comment/{id}/{comment_id}
pub async fn remove_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let post = state
        .posts
        .remove_comment(post_id, comment_id, identity.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}
