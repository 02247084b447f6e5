//! Handlers for posts: listings, detail, create, edit and comments.

use axum::extract::rejection::FormRejection;
use axum::extract::{FromRequest, Path, Query, Request, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use quill_core::error::CoreError;
use quill_core::forms::{self, add_error, CommentForm, PostForm};
use quill_core::pagination::PageOf;
use quill_core::site::{post_detail_path, profile_path, POSTS_PER_PAGE};
use quill_core::types::DbId;
use quill_db::models::comment::{CommentView, CreateComment};
use quill_db::models::group::Group;
use quill_db::models::post::{CreatePost, Post, PostFilter, PostView, UpdatePost};
use quill_db::models::user::AuthorInfo;
use quill_db::repositories::{CommentRepo, FollowRepo, GroupRepo, PostRepo};
use serde::Serialize;

use super::{user_or_404, FormView};
use crate::error::{AppError, AppResult};
use crate::media::{discard_post_image, save_post_image};
use crate::middleware::auth::{MaybeUser, RequireLogin};
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::submission::{BoundPost, PostSubmission, INVALID_CHOICE};

// ---------------------------------------------------------------------------
// View models
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct IndexView {
    pub page_obj: PageOf<PostView>,
}

#[derive(Debug, Serialize)]
pub struct GroupView {
    pub group: Group,
    pub page_obj: PageOf<PostView>,
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub author: AuthorInfo,
    pub post_count: i64,
    /// Whether the current viewer follows `author`. Always `false` for
    /// anonymous viewers.
    pub following: bool,
    pub follower_count: i64,
    pub following_count: i64,
    pub page_obj: PageOf<PostView>,
}

#[derive(Debug, Serialize)]
pub struct PostDetailView {
    pub post: PostView,
    pub author_post_count: i64,
    pub comments: Vec<CommentView>,
    pub form: FormView<CommentForm>,
}

/// A selectable group on the post form.
#[derive(Debug, Serialize)]
pub struct GroupChoice {
    pub id: DbId,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct PostFormView {
    pub form: FormView<PostForm>,
    pub is_edit: bool,
    pub post_id: Option<DbId>,
    /// Media-relative path of the image currently attached to the post.
    pub current_image: Option<String>,
    pub groups: Vec<GroupChoice>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn post_or_404(state: &AppState, post_id: DbId) -> AppResult<Post> {
    PostRepo::find_by_id(&state.pool, post_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Post",
            id: post_id,
        }))
}

async fn group_choices(state: &AppState) -> AppResult<Vec<GroupChoice>> {
    let groups = GroupRepo::list(&state.pool).await?;
    Ok(groups
        .into_iter()
        .map(|g| GroupChoice {
            id: g.id,
            title: g.title,
        })
        .collect())
}

/// Reject a group id that does not exist.
async fn check_group(state: &AppState, bound: &mut BoundPost) -> AppResult<()> {
    if let Some(group_id) = bound.form.group {
        if GroupRepo::find_by_id(&state.pool, group_id).await?.is_none() {
            add_error(&mut bound.errors, "group", INVALID_CHOICE);
        }
    }
    Ok(())
}

async fn render_form(
    state: &AppState,
    form: FormView<PostForm>,
    post: Option<&Post>,
) -> AppResult<Response> {
    let view = PostFormView {
        form,
        is_edit: post.is_some(),
        post_id: post.map(|p| p.id),
        current_image: post.map(|p| p.image.clone()).filter(|i| !i.is_empty()),
        groups: group_choices(state).await?,
    };
    Ok(DataResponse::json(view).into_response())
}

/// Store the accepted upload, if any, returning its media-relative path.
async fn store_image(state: &AppState, bound: &BoundPost) -> AppResult<Option<String>> {
    match &bound.image {
        Some(file) => Ok(Some(save_post_image(&state.config.media_root, file).await?)),
        None => Ok(None),
    }
}

/// Pass `result` through, deleting the just-stored image if the post row
/// that would reference it was not written.
async fn keep_image_if_saved<T>(
    state: &AppState,
    image: Option<&str>,
    result: AppResult<T>,
) -> AppResult<T> {
    if result.is_err() {
        if let Some(path) = image {
            discard_post_image(&state.config.media_root, path).await;
        }
    }
    result
}

fn comment_form(form: Result<Form<CommentForm>, FormRejection>) -> CommentForm {
    match form {
        Ok(Form(form)) => form,
        Err(e) => {
            tracing::debug!(error = %e, "Unreadable comment form, treating as empty");
            CommentForm::default()
        }
    }
}

async fn detail_view(
    state: &AppState,
    post_id: DbId,
    form: FormView<CommentForm>,
) -> AppResult<PostDetailView> {
    let post = PostRepo::find_view_by_id(&state.pool, post_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Post",
            id: post_id,
        }))?;
    let author_post_count = PostRepo::count(&state.pool, PostFilter::Author(post.author_id)).await?;
    let comments = CommentRepo::list_for_post(&state.pool, post_id).await?;

    Ok(PostDetailView {
        post,
        author_post_count,
        comments,
        form,
    })
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// GET /
///
/// Every post, newest first. Served through the response cache.
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<IndexView>>> {
    let page_obj =
        PostRepo::list_page(&state.pool, PostFilter::All, params.raw(), POSTS_PER_PAGE).await?;
    Ok(DataResponse::json(IndexView { page_obj }))
}

/// GET /group/{slug}/
pub async fn group_posts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<GroupView>>> {
    let group = GroupRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::not_found_by_key("Group", &slug))?;

    let page_obj = PostRepo::list_page(
        &state.pool,
        PostFilter::Group(group.id),
        params.raw(),
        POSTS_PER_PAGE,
    )
    .await?;

    Ok(DataResponse::json(GroupView { group, page_obj }))
}

/// GET /profile/{username}/
pub async fn profile(
    viewer: MaybeUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<ProfileView>>> {
    let author = user_or_404(&state, &username).await?;

    let page_obj = PostRepo::list_page(
        &state.pool,
        PostFilter::Author(author.id),
        params.raw(),
        POSTS_PER_PAGE,
    )
    .await?;

    let following = match viewer.user_id() {
        Some(viewer_id) => FollowRepo::exists(&state.pool, viewer_id, author.id).await?,
        None => false,
    };

    let follower_count = FollowRepo::count_followers(&state.pool, author.id).await?;
    let following_count = FollowRepo::count_following(&state.pool, author.id).await?;

    Ok(DataResponse::json(ProfileView {
        author: AuthorInfo::from(&author),
        post_count: page_obj.page.total_items,
        following,
        follower_count,
        following_count,
        page_obj,
    }))
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

/// GET /posts/{post_id}/
pub async fn post_detail(
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
) -> AppResult<Json<DataResponse<PostDetailView>>> {
    let view = detail_view(&state, post_id, FormView::unbound(CommentForm::default())).await?;
    Ok(DataResponse::json(view))
}

/// POST /posts/{post_id}/
///
/// Binds and validates the comment form and shows it on the detail page.
/// Nothing is stored; comments are saved through `/posts/{post_id}/comment/`.
pub async fn post_detail_submit(
    RequireLogin(_user): RequireLogin,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    form: Result<Form<CommentForm>, FormRejection>,
) -> AppResult<Json<DataResponse<PostDetailView>>> {
    let form = comment_form(form);
    let errors = forms::check(&form).err().unwrap_or_default();
    let view = detail_view(&state, post_id, FormView::bound(form, errors)).await?;
    Ok(DataResponse::json(view))
}

// ---------------------------------------------------------------------------
// Create / edit
// ---------------------------------------------------------------------------

/// GET /create/
pub async fn create_form(
    RequireLogin(_user): RequireLogin,
    State(state): State<AppState>,
) -> AppResult<Response> {
    render_form(&state, FormView::unbound(PostForm::default()), None).await
}

/// POST /create/
///
/// On success redirects to the author's profile. Invalid input re-renders
/// the form with the submitted values and nothing is stored.
pub async fn create(
    RequireLogin(user): RequireLogin,
    State(state): State<AppState>,
    submission: PostSubmission,
) -> AppResult<Response> {
    let mut bound = submission.bind();
    check_group(&state, &mut bound).await?;
    if !bound.is_valid() {
        tracing::debug!(user_id = user.user_id, errors = ?bound.errors, "Rejected post form");
        return render_form(&state, FormView::bound(bound.form, bound.errors), None).await;
    }

    let image = store_image(&state, &bound).await?;
    let created = PostRepo::create(
        &state.pool,
        &CreatePost {
            text: bound.form.text,
            group_id: bound.form.group,
            author_id: user.user_id,
            image: image.clone(),
        },
    )
    .await
    .map_err(AppError::from);
    let post = keep_image_if_saved(&state, image.as_deref(), created).await?;

    tracing::info!(
        post_id = post.id,
        author_id = user.user_id,
        group_id = ?post.group_id,
        "Post created"
    );

    Ok(Redirect::to(&profile_path(&user.username)).into_response())
}

/// GET /posts/{post_id}/edit/
///
/// Anyone but the author is sent back to the post without a message.
pub async fn edit_form(
    viewer: MaybeUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
) -> AppResult<Response> {
    let post = post_or_404(&state, post_id).await?;
    if viewer.user_id() != Some(post.author_id) {
        return Ok(Redirect::to(&post_detail_path(post.id)).into_response());
    }

    let form = PostForm {
        text: post.text.clone(),
        group: post.group_id,
    };
    render_form(&state, FormView::unbound(form), Some(&post)).await
}

/// POST /posts/{post_id}/edit/
///
/// Keeps the stored image unless a new one is uploaded. The publication
/// date never changes. The body is only read once the viewer is known to
/// be the author.
pub async fn edit(
    viewer: MaybeUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    request: Request,
) -> AppResult<Response> {
    let post = post_or_404(&state, post_id).await?;
    let user_id = match viewer.user_id() {
        Some(id) if id == post.author_id => id,
        other => {
            tracing::debug!(post_id, viewer = ?other, "Ignored edit by non-author");
            return Ok(Redirect::to(&post_detail_path(post.id)).into_response());
        }
    };

    let submission = PostSubmission::from_request(request, &state).await?;
    let mut bound = submission.bind();
    check_group(&state, &mut bound).await?;
    if !bound.is_valid() {
        return render_form(&state, FormView::bound(bound.form, bound.errors), Some(&post)).await;
    }

    let image = store_image(&state, &bound).await?;
    let saved = PostRepo::update(
        &state.pool,
        post.id,
        &UpdatePost {
            text: bound.form.text,
            group_id: bound.form.group,
            author_id: user_id,
            image: image.clone(),
        },
    )
    .await
    .map_err(AppError::from)
    .and_then(|updated| {
        updated.ok_or(AppError::Core(CoreError::NotFound {
            entity: "Post",
            id: post.id,
        }))
    });
    let updated = keep_image_if_saved(&state, image.as_deref(), saved).await?;

    tracing::info!(post_id = updated.id, author_id = user_id, "Post updated");

    Ok(Redirect::to(&post_detail_path(updated.id)).into_response())
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// POST /posts/{post_id}/comment/
///
/// Always redirects back to the post; invalid input is dropped.
pub async fn add_comment(
    RequireLogin(user): RequireLogin,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    form: Result<Form<CommentForm>, FormRejection>,
) -> AppResult<Redirect> {
    let post = post_or_404(&state, post_id).await?;
    let form = comment_form(form);

    match forms::check(&form) {
        Ok(()) => {
            let comment = CommentRepo::create(
                &state.pool,
                &CreateComment {
                    post_id: post.id,
                    author_id: user.user_id,
                    text: form.text,
                },
            )
            .await?;
            tracing::info!(
                comment_id = comment.id,
                post_id = post.id,
                author_id = user.user_id,
                "Comment added"
            );
        }
        Err(errors) => {
            tracing::debug!(post_id = post.id, ?errors, "Dropped invalid comment");
        }
    }

    Ok(Redirect::to(&post_detail_path(post.id)))
}
