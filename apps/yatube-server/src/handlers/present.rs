//! Conversions from service results to wire types.

use yatube_core::domain::{Group, UserSummary};
use yatube_core::services::{CommentCard, Page, PostCard, PostDetail};
use yatube_shared::dto::{
    CommentResponse, GroupResponse, PageResponse, PostDetailResponse, PostResponse, UserResponse,
};

pub fn user(summary: UserSummary) -> UserResponse {
    UserResponse {
        id: summary.id,
        username: summary.username,
        full_name: summary.full_name,
    }
}

pub fn group(group: Group) -> GroupResponse {
    GroupResponse {
        id: group.id,
        title: group.title,
        slug: group.slug,
        description: group.description,
    }
}

pub fn post(card: PostCard) -> PostResponse {
    PostResponse {
        id: card.post.id,
        text: card.post.text,
        pub_date: card.post.pub_date,
        author: user(card.author),
        group: card.group.map(group),
        image: card.post.image,
    }
}

pub fn comment(card: CommentCard) -> CommentResponse {
    CommentResponse {
        id: card.comment.id,
        post_id: card.comment.post_id,
        text: card.comment.text,
        created: card.comment.created,
        author: user(card.author),
    }
}

pub fn post_detail(detail: PostDetail) -> PostDetailResponse {
    PostDetailResponse {
        post: post(detail.card),
        author_post_count: detail.author_post_count,
        comments: detail.comments.into_iter().map(comment).collect(),
    }
}

pub fn page(page: Page<PostCard>) -> PageResponse<PostResponse> {
    let has_next = page.has_next();
    let has_previous = page.has_previous();
    let next_page = page.next_page_number();
    let previous_page = page.previous_page_number();
    let page = page.map(post);

    PageResponse {
        number: page.number,
        num_pages: page.num_pages,
        count: page.count,
        per_page: page.per_page,
        has_next,
        has_previous,
        next_page,
        previous_page,
        items: page.items,
    }
}
