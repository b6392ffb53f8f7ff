//! Integration tests per il catalogo dei tutor
//!
//! Test per:
//! - GET /tutors
//! - GET /tutors/{tutor_id}
//! - GET /tutors/{tutor_id}/reviews

mod common;

#[cfg(test)]
mod tutor_tests {
    use super::common::*;
    use axum_test::http::HeaderName;
    use serde_json::Value;

    fn auth() -> HeaderName {
        HeaderName::from_static("authorization")
    }

    #[tokio::test]
    async fn test_list_tutors_with_rating_summary() {
        let backend = seeded_backend(None).await;
        let server = create_test_server(create_test_state(&backend));

        let response = server
            .get("/tutors")
            .add_header(auth(), bearer(STUDENT_ADA))
            .await;

        response.assert_status_ok();
        let tutors: Vec<Value> = response.json();
        assert_eq!(tutors.len(), 2);

        assert_eq!(tutors[0]["user"]["id"], TUTOR_GRACE);
        assert_eq!(tutors[0]["average_rating"], 4.3);
        assert_eq!(tutors[0]["review_count"], 3);

        assert_eq!(tutors[1]["user"]["id"], TUTOR_ALAN);
        assert!(tutors[1]["average_rating"].is_null());
        assert!(tutors[1]["availability"].is_null());
        assert_eq!(tutors[1]["review_count"], 0);
    }

    #[tokio::test]
    async fn test_get_tutor_detail() {
        let backend = seeded_backend(None).await;
        let server = create_test_server(create_test_state(&backend));

        let response = server
            .get(&format!("/tutors/{}", TUTOR_GRACE))
            .add_header(auth(), bearer(STUDENT_ADA))
            .await;

        response.assert_status_ok();
        let tutor: Value = response.json();
        assert_eq!(tutor["user"]["first_name"], "Grace");
        assert_eq!(tutor["hourly_rate"], 45.0);
        assert_eq!(tutor["currency"], "NZD");
        assert_eq!(tutor["member_since"], 2021);
        assert_eq!(tutor["subjects"], serde_json::json!(["Mathematics", "Physics"]));
        assert_eq!(tutor["availability"]["days"][0], "monday");
        assert_eq!(tutor["availability"]["start_time"], "09:00:00");
        assert_eq!(tutor["availability"]["end_time"], "18:00:00");
        assert_eq!(tutor["reviews"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_get_student_as_tutor_not_found() {
        let backend = seeded_backend(None).await;
        let server = create_test_server(create_test_state(&backend));

        let response = server
            .get(&format!("/tutors/{}", STUDENT_LINUS))
            .add_header(auth(), bearer(STUDENT_ADA))
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_list_tutor_reviews() {
        let backend = seeded_backend(None).await;
        let server = create_test_server(create_test_state(&backend));

        let response = server
            .get(&format!("/tutors/{}/reviews", TUTOR_ALAN))
            .add_header(auth(), bearer(STUDENT_ADA))
            .await;

        response.assert_status_ok();
        let reviews: Vec<Value> = response.json();
        assert!(reviews.is_empty());
    }
}
