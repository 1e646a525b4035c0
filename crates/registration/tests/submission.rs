use std::fs;

use mockito::Matcher;
use registration::{
    Action, Coordinator, FirmField, Form, ImageFile, NotificationLevel, RegistrationClient,
    Route, SubmissionState,
};

const ENDPOINT: &str = "/api/insert-participant-idcard";

fn photo(dir: &tempfile::TempDir, name: &str, size: usize) -> ImageFile {
    let path = dir.path().join(name);
    fs::write(&path, vec![b'x'; size]).unwrap();
    ImageFile::load(&path).unwrap()
}

fn acme_form(image: ImageFile) -> Form {
    let mut form = Form::new();
    form.dispatch(Action::SetFirmField(FirmField::Name, "Acme".to_string()));
    form.dispatch(Action::SetFirmField(
        FirmField::BrandName,
        "AcmeBrand".to_string(),
    ));
    form.dispatch(Action::SetFirmField(FirmField::Email, "a@b.com".to_string()));
    form.dispatch(Action::SetRepresentativeName(0, "Jane".to_string()));
    form.dispatch(Action::SetRepresentativeImage(0, image));
    form
}

fn field(name: &str, value: &str) -> Matcher {
    Matcher::Regex(format!(
        r#"name="{}"\r\n\r\n{}\r\n"#,
        regex_escape(name),
        regex_escape(value)
    ))
}

fn regex_escape(raw: &str) -> String {
    raw.replace('[', r"\[").replace(']', r"\]").replace('.', r"\.")
}

#[tokio::test]
async fn valid_registration_posts_once_and_navigates() {
    let dir = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            field("id_name_of_firm", "Acme"),
            field("id_card_brand_name", "AcmeBrand"),
            field("id_firm_email", "a@b.com"),
            field("register_counter", "1"),
            field("idcardsub[0][idcardsub_rep_name]", "Jane"),
            field("idcardsub[0][idcardsub_rep_mobile]", ""),
            Matcher::Regex(r#"name="idcardsub\[0\]\[idcardsub_rep_image\]"; filename="jane\.jpg""#.to_string()),
            Matcher::Regex("Content-Type: image/jpeg".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"msg":"ok"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = RegistrationClient::new(&server.url()).unwrap();
    let mut coordinator = Coordinator::new();
    let mut form = acme_form(photo(&dir, "jane.jpg", 120 * 1024));

    let completion = coordinator.submit(&mut form, &client).await.unwrap();

    mock.assert_async().await;
    assert_eq!(completion.navigate, Some(Route::ThankYou));
    assert_eq!(completion.notification.level, NotificationLevel::Success);
    assert_eq!(completion.notification.description, "ok");
    assert_eq!(coordinator.state(), &SubmissionState::Succeeded);
}

#[tokio::test]
async fn invalid_form_never_reaches_server() {
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", ENDPOINT).expect(0).create_async().await;

    let client = RegistrationClient::new(&server.url()).unwrap();
    let mut coordinator = Coordinator::new();
    let mut form = Form::new();
    form.dispatch(Action::SetFirmField(
        FirmField::Email,
        "not-an-email".to_string(),
    ));

    assert!(coordinator.submit(&mut form, &client).await.is_none());

    mock.assert_async().await;
    assert!(form.errors.firm.email.is_some());
    assert_eq!(coordinator.state(), &SubmissionState::Idle);
}

#[tokio::test]
async fn rejection_message_comes_from_body() {
    let dir = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", ENDPOINT)
        .with_status(422)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Email already registered"}"#)
        .create_async()
        .await;

    let client = RegistrationClient::new(&server.url()).unwrap();
    let mut coordinator = Coordinator::new();
    let mut form = acme_form(photo(&dir, "jane.png", 64));

    let completion = coordinator.submit(&mut form, &client).await.unwrap();

    assert_eq!(completion.navigate, None);
    assert_eq!(completion.notification.title, "Error");
    assert_eq!(
        coordinator.state(),
        &SubmissionState::Failed("Email already registered".to_string())
    );
}

#[tokio::test]
async fn malformed_error_body_falls_back_to_generic_message() {
    let dir = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", ENDPOINT)
        .with_status(500)
        .with_body("<html>upstream down</html>")
        .create_async()
        .await;

    let client = RegistrationClient::new(&server.url()).unwrap();
    let mut coordinator = Coordinator::new();
    let mut form = acme_form(photo(&dir, "jane.png", 64));

    let completion = coordinator.submit(&mut form, &client).await.unwrap();

    assert_eq!(completion.notification.description, "Something went wrong");
    assert_eq!(
        coordinator.state(),
        &SubmissionState::Failed("Something went wrong".to_string())
    );
}

#[tokio::test]
async fn success_without_json_body_uses_default_message() {
    let dir = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", ENDPOINT)
        .with_status(201)
        .create_async()
        .await;

    let client = RegistrationClient::new(&server.url()).unwrap();
    let mut coordinator = Coordinator::new();
    let mut form = acme_form(photo(&dir, "jane.png", 64));

    let completion = coordinator.submit(&mut form, &client).await.unwrap();

    assert_eq!(
        completion.notification.description,
        "ID Card created successfully"
    );
    assert_eq!(completion.navigate, Some(Route::ThankYou));
}

#[tokio::test]
async fn unreachable_server_fails_without_fault() {
    let dir = tempfile::tempdir().unwrap();
    let client = RegistrationClient::new("http://127.0.0.1:1").unwrap();
    let mut coordinator = Coordinator::new();
    let mut form = acme_form(photo(&dir, "jane.png", 64));

    let completion = coordinator.submit(&mut form, &client).await.unwrap();

    assert_eq!(completion.notification.level, NotificationLevel::Error);
    assert_eq!(
        coordinator.state(),
        &SubmissionState::Failed("Something went wrong".to_string())
    );
}

#[test]
fn loading_a_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(ImageFile::load(dir.path()).is_err());
}
