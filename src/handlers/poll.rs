use crate::actix_web::{
    http::header,
    web::{Data, Form, Path},
    HttpResponse,
};
use crate::core::ports::repository::Manager;
use crate::core::renderer::{Renderer, DETAIL_TEMPLATE, INDEX_TEMPLATE, RESULTS_TEMPLATE};
use crate::core::services::poll::{self as service, VoteOutcome};
use crate::error::Error;
use crate::handlers::render;
use crate::request::VoteForm;
use chrono::Utc;

pub async fn index<M, R>(manager: Data<M>, renderer: Data<R>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
    R: Renderer + 'static,
{
    let mut storer = manager.db().await?;
    let page = service::latest_questions(&mut storer, Utc::now()).await?;
    render(renderer.get_ref(), INDEX_TEMPLATE, &page)
}

pub async fn detail<M, R>(question_id: Path<i32>, manager: Data<M>, renderer: Data<R>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
    R: Renderer + 'static,
{
    let mut storer = manager.db().await?;
    let detail = service::question_detail(&mut storer, question_id.into_inner()).await?;
    render(renderer.get_ref(), DETAIL_TEMPLATE, &detail)
}

pub async fn results<M, R>(question_id: Path<i32>, manager: Data<M>, renderer: Data<R>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
    R: Renderer + 'static,
{
    let mut storer = manager.db().await?;
    let results = service::question_results(&mut storer, question_id.into_inner()).await?;
    render(renderer.get_ref(), RESULTS_TEMPLATE, &results)
}

pub async fn vote<M, R>(question_id: Path<i32>, form: Option<Form<VoteForm>>, manager: Data<M>, renderer: Data<R>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
    R: Renderer + 'static,
{
    // a post without a usable form body is a vote without a choice
    let choice = form.and_then(|f| f.into_inner().choice);
    let mut storer = manager.db().await?;
    match service::vote(&mut storer, question_id.into_inner(), choice.as_deref()).await? {
        // redirect so that reloading the results page does not vote twice
        VoteOutcome::Accepted { question_id } => Ok(HttpResponse::SeeOther()
            .insert_header((header::LOCATION, format!("/polls/{}/results/", question_id)))
            .finish()),
        VoteOutcome::Rejected(detail) => render(renderer.get_ref(), DETAIL_TEMPLATE, &detail),
    }
}

#[cfg(test)]
mod test {
    use crate::actix_web::{
        http::{header, StatusCode},
        test,
    };
    use crate::core::models::choice::Choice;
    use crate::core::ports::repository::{ChoiceCommon, Manager};
    use crate::core::services::poll::question_detail;
    use crate::handlers::testing::seed;
    use crate::impls::repository::memory::MemoryManager;
    use chrono::{Duration, Utc};
    use std::collections::HashMap;

    async fn choices(manager: &MemoryManager, question_id: i32) -> Vec<Choice> {
        question_detail(&mut manager.db().await.unwrap(), question_id).await.unwrap().choices
    }

    fn form(choice: Option<String>) -> HashMap<&'static str, String> {
        choice.into_iter().map(|c| ("choice", c)).collect()
    }

    #[actix_web::test]
    async fn test_index_without_questions() {
        let manager = MemoryManager::new();
        let app = test_app!(manager.clone());
        let resp = test::call_service(&app, test::TestRequest::get().uri("/polls/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("No polls are available."));
    }

    #[actix_web::test]
    async fn test_index_lists_past_and_hides_future_questions() {
        let manager = MemoryManager::new();
        seed(&manager, "Past question", Utc::now() - Duration::days(30), &[]).await;
        seed(&manager, "Future question", Utc::now() + Duration::days(30), &[]).await;
        let app = test_app!(manager.clone());
        let resp = test::call_service(&app, test::TestRequest::get().uri("/polls/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("Past question"));
        assert!(!body.contains("Future question"));
        assert!(!body.contains("No polls are available."));
    }

    #[actix_web::test]
    async fn test_index_only_future_questions() {
        let manager = MemoryManager::new();
        seed(&manager, "Future question", Utc::now() + Duration::days(30), &[]).await;
        let app = test_app!(manager.clone());
        let resp = test::call_service(&app, test::TestRequest::get().uri("/polls/").to_request()).await;
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("No polls are available."));
    }

    #[actix_web::test]
    async fn test_detail_and_results() {
        let manager = MemoryManager::new();
        let qid = seed(&manager, "Best colour", Utc::now(), &["Red", "Blue"]).await;
        let app = test_app!(manager.clone());

        let resp = test::call_service(&app, test::TestRequest::get().uri(&format!("/polls/{}/", qid)).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("Best colour"));
        assert!(body.contains("Red"));
        assert!(body.contains("Blue"));

        let resp = test::call_service(&app, test::TestRequest::get().uri(&format!("/polls/{}/results/", qid)).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("Red -- 0 votes"));
    }

    #[actix_web::test]
    async fn test_detail_and_results_not_found() {
        let manager = MemoryManager::new();
        let app = test_app!(manager.clone());
        for uri in ["/polls/1/", "/polls/1/results/", "/polls/abc/"] {
            let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn test_vote_redirects_to_results() {
        let manager = MemoryManager::new();
        let qid = seed(&manager, "Best colour", Utc::now(), &["Red", "Blue"]).await;
        let red = choices(&manager, qid).await[0].id;
        let app = test_app!(manager.clone());

        let req = test::TestRequest::post().uri(&format!("/polls/{}/vote/", qid)).set_form(form(Some(red.to_string()))).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), format!("/polls/{}/results/", qid).as_str());
        assert_eq!(choices(&manager, qid).await.iter().map(|c| c.votes).collect::<Vec<_>>(), vec![1, 0]);

        let resp = test::call_service(&app, test::TestRequest::get().uri(&format!("/polls/{}/results/", qid)).to_request()).await;
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("Red -- 1 vote</li>"));
    }

    #[actix_web::test]
    async fn test_vote_with_invalid_choice_rerenders_detail() {
        let manager = MemoryManager::new();
        let qid = seed(&manager, "Best colour", Utc::now(), &["Red", "Blue"]).await;
        let other = seed(&manager, "Best animal", Utc::now(), &["Cat"]).await;
        let cat = choices(&manager, other).await[0].id;
        let app = test_app!(manager.clone());

        for choice in [None, Some("nope".to_string()), Some("12345".to_string()), Some(cat.to_string())] {
            let req = test::TestRequest::post().uri(&format!("/polls/{}/vote/", qid)).set_form(form(choice)).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
            assert!(body.contains("Select a valid choice."));
            assert!(body.contains("Best colour"));
        }
        assert!(choices(&manager, qid).await.iter().all(|c| c.votes == 0));
        assert!(choices(&manager, other).await.iter().all(|c| c.votes == 0));
    }

    #[actix_web::test]
    async fn test_vote_without_body() {
        let manager = MemoryManager::new();
        let qid = seed(&manager, "Best colour", Utc::now(), &["Red", "Blue"]).await;
        let app = test_app!(manager.clone());

        let resp = test::call_service(&app, test::TestRequest::post().uri(&format!("/polls/{}/vote/", qid)).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("Select a valid choice."));
        assert!(choices(&manager, qid).await.iter().all(|c| c.votes == 0));

        let resp = test::call_service(&app, test::TestRequest::post().uri("/polls/999/vote/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_vote_on_missing_question() {
        let manager = MemoryManager::new();
        let app = test_app!(manager.clone());
        let req = test::TestRequest::post().uri("/polls/9/vote/").set_form(form(Some("1".into()))).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_vote_counts_accumulate() {
        let manager = MemoryManager::new();
        let qid = seed(&manager, "Best colour", Utc::now(), &["Red"]).await;
        let red = choices(&manager, qid).await[0].id;
        let app = test_app!(manager.clone());
        for _ in 0..3 {
            let req = test::TestRequest::post().uri(&format!("/polls/{}/vote/", qid)).set_form(form(Some(red.to_string()))).to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::SEE_OTHER);
        }
        let mut storer = manager.db().await.unwrap();
        assert_eq!(ChoiceCommon::get(&mut storer, qid, red).await.unwrap().unwrap().votes, 3);
    }
}
