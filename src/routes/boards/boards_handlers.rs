use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use log::info;

use super::boards_models::{
    BoardListQuery, BoardListResponse, BoardResponse, BoardSummary, BoardTasksResponse,
    CreateBoardRequest, ReorderBoardsRequest, UpdateBoardRequest,
};
use crate::health::board_health_score;
use crate::models::task::Task;
use crate::mutators::{self, BoardPatch, NewBoard, NewTask, StateError};
use crate::routes::state_error_response;
use crate::routes::tasks::tasks_models::{CreateTaskRequest, TaskResponse, TaskView};
use crate::search::{search_boards, SearchOptions};
use crate::store::container::StateContainer;

pub async fn list_boards(
    container: web::Data<StateContainer>,
    query: web::Query<BoardListQuery>,
) -> impl Responder {
    let now = Utc::now();
    let term = query.search.clone().unwrap_or_default();

    let boards = container
        .read(|state| {
            let ordered: Vec<_> = state.ordered_boards().into_iter().cloned().collect();
            search_boards(&ordered, &term, &SearchOptions::default())
                .into_iter()
                .map(|board| {
                    let tasks: Vec<Task> = state.tasks_for_board(&board.id).cloned().collect();
                    BoardSummary {
                        board: board.clone(),
                        task_count: tasks.len(),
                        health_score: board_health_score(&tasks, now),
                    }
                })
                .collect::<Vec<_>>()
        })
        .await;

    info!("Listing {} boards", boards.len());
    HttpResponse::Ok().json(BoardListResponse { boards })
}

pub async fn create_board(
    container: web::Data<StateContainer>,
    body: web::Json<CreateBoardRequest>,
) -> impl Responder {
    let body = body.into_inner();
    let input = NewBoard {
        name: body.name,
        order: body.order,
    };

    match container
        .apply(|state| mutators::create_board(state, input, Utc::now()))
        .await
    {
        Ok(board) => {
            info!("Created board {} ({})", board.name, board.id);
            HttpResponse::Created().json(BoardResponse {
                success: true,
                message: "Board created".into(),
                board: Some(board),
            })
        }
        Err(e) => state_error_response(e),
    }
}

pub async fn update_board(
    container: web::Data<StateContainer>,
    path: web::Path<String>,
    body: web::Json<UpdateBoardRequest>,
) -> impl Responder {
    let board_id = path.into_inner();
    let body = body.into_inner();
    let patch = BoardPatch {
        name: body.name,
        order: body.order,
    };

    match container
        .apply(|state| mutators::update_board(state, &board_id, patch))
        .await
    {
        Ok(board) => {
            info!("Updated board {}", board.id);
            HttpResponse::Ok().json(BoardResponse {
                success: true,
                message: "Board updated".into(),
                board: Some(board),
            })
        }
        Err(e) => state_error_response(e),
    }
}

pub async fn delete_board(
    container: web::Data<StateContainer>,
    path: web::Path<String>,
) -> impl Responder {
    let board_id = path.into_inner();

    match container
        .apply(|state| mutators::delete_board(state, &board_id))
        .await
    {
        Ok(board) => {
            info!("Deleted board {} and its tasks", board.id);
            HttpResponse::Ok().json(BoardResponse {
                success: true,
                message: "Board deleted".into(),
                board: Some(board),
            })
        }
        Err(e) => state_error_response(e),
    }
}

pub async fn reorder_boards(
    container: web::Data<StateContainer>,
    body: web::Json<ReorderBoardsRequest>,
) -> impl Responder {
    let board_ids = body.into_inner().board_ids;

    match container
        .apply(|state| mutators::reorder_boards(state, &board_ids).map(|next| (next, ())))
        .await
    {
        Ok(()) => {
            info!("Reordered {} boards", board_ids.len());
            HttpResponse::Ok().json(BoardResponse {
                success: true,
                message: "Boards reordered".into(),
                board: None,
            })
        }
        Err(e) => state_error_response(e),
    }
}

pub async fn list_board_tasks(
    container: web::Data<StateContainer>,
    path: web::Path<String>,
) -> impl Responder {
    let board_id = path.into_inner();
    let now = Utc::now();

    let found = container
        .read(|state| {
            state.board(&board_id).cloned().map(|board| {
                let tasks: Vec<Task> = state.tasks_for_board(&board_id).cloned().collect();
                BoardTasksResponse {
                    board,
                    health_score: board_health_score(&tasks, now),
                    tasks: tasks.iter().map(|task| TaskView::new(task, now)).collect(),
                }
            })
        })
        .await;

    match found {
        Some(response) => HttpResponse::Ok().json(response),
        None => state_error_response(StateError::BoardNotFound(board_id)),
    }
}

pub async fn create_task(
    container: web::Data<StateContainer>,
    path: web::Path<String>,
    body: web::Json<CreateTaskRequest>,
) -> impl Responder {
    let board_id = path.into_inner();
    let input: NewTask = body.into_inner().into();

    match container
        .apply(|state| mutators::create_task(state, &board_id, input, Utc::now()))
        .await
    {
        Ok(task) => {
            info!("Created task {} on board {}", task.id, board_id);
            HttpResponse::Created().json(TaskResponse {
                success: true,
                message: "Task created".into(),
                task: Some(task),
                log: None,
            })
        }
        Err(e) => state_error_response(e),
    }
}
