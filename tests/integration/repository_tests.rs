//! Database tests. Each test gets a fresh migrated database.
//!
//! Run with: DATABASE_URL=postgres://... cargo test -- --ignored

use chrono::{Days, Local, NaiveDate};
use sqlx::PgPool;
use uuid::Uuid;

use catalog_server::{
    error::AppError,
    models::{
        author::AuthorData,
        book::CreateBook,
        book_instance::{CreateBookInstance, LoanStatus},
        genre::{CreateGenre, CreateLanguage},
        renewal::RenewBookForm,
    },
    repository::Repository,
    services::{
        catalog::CatalogService,
        loans::{LoansService, RenewalOutcome},
    },
};

fn author_data(first: &str, last: &str) -> AuthorData {
    AuthorData {
        first_name: first.to_string(),
        last_name: last.to_string(),
        date_of_birth: None,
        date_of_death: None,
    }
}

async fn seed_book(repo: &Repository, title: &str, isbn: &str, author_id: Option<i32>) -> i32 {
    repo.books
        .create(&CreateBook {
            title: title.to_string(),
            summary: String::new(),
            isbn: isbn.to_string(),
            author_id,
            genre_ids: vec![],
            language_ids: vec![],
        })
        .await
        .unwrap()
        .id
}

async fn seed_copy(repo: &Repository, book_id: i32, status: LoanStatus) -> Uuid {
    repo.book_instances
        .create(&CreateBookInstance {
            book_id: Some(book_id),
            imprint: "Unlikely Imprint, 2016".to_string(),
            status,
            due_back: None,
        })
        .await
        .unwrap()
        .id
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn renew_form(date: NaiveDate) -> RenewBookForm {
    RenewBookForm {
        renewal_date: Some(date.to_string()),
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_renew_updates_due_date_only(pool: PgPool) {
    let repo = Repository::new(pool);
    let loans = LoansService::new(repo.clone());

    let borrower = repo.users.create("reader").await.unwrap();
    let book = seed_book(&repo, "Book Title", "ABCDEFG", None).await;
    let copy = seed_copy(&repo, book, LoanStatus::Available).await;
    repo.book_instances
        .lend(copy, borrower.id, today() + Days::new(5))
        .await
        .unwrap();

    let new_date = today() + Days::new(14);
    let outcome = loans.renew(copy, &renew_form(new_date), today()).await.unwrap();

    let RenewalOutcome::Renewed(renewed) = outcome else {
        panic!("renewal should succeed");
    };
    assert_eq!(renewed.due_back, Some(new_date));
    assert_eq!(renewed.status, LoanStatus::OnLoan);
    let shown = renewed.borrower.expect("borrower kept");
    let stored = repo.users.get_by_id(borrower.id).await.unwrap();
    assert_eq!((shown.id, shown.username), (stored.id, stored.username));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_renew_unknown_copy_is_not_found(pool: PgPool) {
    let loans = LoansService::new(Repository::new(pool));

    // Valid date: the lookup fails first regardless
    let result = loans
        .renew(Uuid::new_v4(), &renew_form(today() + Days::new(7)), today())
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_rejected_renewal_leaves_copy_untouched(pool: PgPool) {
    let repo = Repository::new(pool);
    let loans = LoansService::new(repo.clone());

    let borrower = repo.users.create("reader").await.unwrap();
    let book = seed_book(&repo, "Book Title", "ABCDEFG", None).await;
    let copy = seed_copy(&repo, book, LoanStatus::Available).await;
    let original_due = today() + Days::new(5);
    repo.book_instances
        .lend(copy, borrower.id, original_due)
        .await
        .unwrap();

    for date in [today() - Days::new(1), today() + Days::new(29)] {
        let outcome = loans.renew(copy, &renew_form(date), today()).await.unwrap();
        match outcome {
            RenewalOutcome::Rejected { copy: shown, errors } => {
                assert_eq!(shown.id, copy);
                assert!(errors.get("renewal_date").is_some());
            }
            RenewalOutcome::Renewed(_) => panic!("{} should be refused", date),
        }
    }

    let stored = repo.book_instances.get_by_id(copy).await.unwrap();
    assert_eq!(stored.due_back, Some(original_due));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_renew_accepts_boundaries(pool: PgPool) {
    let repo = Repository::new(pool);
    let loans = LoansService::new(repo.clone());

    let borrower = repo.users.create("reader").await.unwrap();
    let book = seed_book(&repo, "Book Title", "ABCDEFG", None).await;
    let copy = seed_copy(&repo, book, LoanStatus::Available).await;
    repo.book_instances
        .lend(copy, borrower.id, today())
        .await
        .unwrap();

    for date in [today(), today() + Days::new(28)] {
        let outcome = loans.renew(copy, &renew_form(date), today()).await.unwrap();
        assert!(matches!(outcome, RenewalOutcome::Renewed(_)), "{} should be accepted", date);
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_borrowed_by_filters_and_sorts(pool: PgPool) {
    let repo = Repository::new(pool);
    let loans = LoansService::new(repo.clone());

    let alice = repo.users.create("alice").await.unwrap();
    let bob = repo.users.create("bob").await.unwrap();
    let book = seed_book(&repo, "Book Title", "ABCDEFG", None).await;

    let later = seed_copy(&repo, book, LoanStatus::Available).await;
    let sooner = seed_copy(&repo, book, LoanStatus::Available).await;
    let bobs = seed_copy(&repo, book, LoanStatus::Available).await;
    let idle = seed_copy(&repo, book, LoanStatus::Available).await;

    repo.book_instances
        .lend(later, alice.id, today() + Days::new(10))
        .await
        .unwrap();
    repo.book_instances
        .lend(sooner, alice.id, today() + Days::new(2))
        .await
        .unwrap();
    repo.book_instances
        .lend(bobs, bob.id, today() + Days::new(1))
        .await
        .unwrap();

    let mine: Vec<Uuid> = loans
        .borrowed_by(alice.id)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(mine, vec![sooner, later]);

    let all: Vec<Uuid> = loans
        .on_loan()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(all, vec![bobs, sooner, later]);
    assert!(!all.contains(&idle));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_overdue_copies_are_flagged(pool: PgPool) {
    let repo = Repository::new(pool);
    let loans = LoansService::new(repo.clone());

    let borrower = repo.users.create("reader").await.unwrap();
    let book = seed_book(&repo, "Book Title", "ABCDEFG", None).await;
    let late = seed_copy(&repo, book, LoanStatus::Available).await;
    let due_today = seed_copy(&repo, book, LoanStatus::Available).await;
    repo.book_instances
        .lend(late, borrower.id, today() - Days::new(3))
        .await
        .unwrap();
    repo.book_instances
        .lend(due_today, borrower.id, today())
        .await
        .unwrap();

    let copies = loans.borrowed_by(borrower.id).await.unwrap();
    assert_eq!(copies.len(), 2);
    assert!(copies[0].is_overdue);
    assert!(!copies[1].is_overdue);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_deleting_author_keeps_books(pool: PgPool) {
    let repo = Repository::new(pool);

    let author = repo.authors.create(&author_data("Big", "Bob")).await.unwrap();
    let book = seed_book(&repo, "Book Title", "ABCDEFG", Some(author.id)).await;

    repo.authors.delete(author.id).await.unwrap();

    let stored = repo.books.get_by_id(book).await.unwrap();
    assert_eq!(stored.author_id, None);
    assert!(matches!(
        repo.authors.get_by_id(author.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_deleting_missing_author_is_not_found(pool: PgPool) {
    let repo = Repository::new(pool);
    assert!(matches!(repo.authors.delete(999).await, Err(AppError::NotFound(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_book_with_copies_cannot_be_deleted(pool: PgPool) {
    let repo = Repository::new(pool);

    let book = seed_book(&repo, "Book Title", "ABCDEFG", None).await;
    seed_copy(&repo, book, LoanStatus::Maintenance).await;

    assert!(matches!(repo.books.delete(book).await, Err(AppError::Integrity(_))));
    assert!(repo.books.get_by_id(book).await.is_ok());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_duplicate_isbn_is_conflict(pool: PgPool) {
    let repo = Repository::new(pool);

    seed_book(&repo, "First", "9780000000001", None).await;
    let result = repo
        .books
        .create(&CreateBook {
            title: "Second".to_string(),
            summary: String::new(),
            isbn: "9780000000001".to_string(),
            author_id: None,
            genre_ids: vec![],
            language_ids: vec![],
        })
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_authors_listed_by_first_then_last_name(pool: PgPool) {
    let repo = Repository::new(pool);

    repo.authors.create(&author_data("Zadie", "Smith")).await.unwrap();
    repo.authors.create(&author_data("Anne", "Tyler")).await.unwrap();
    repo.authors.create(&author_data("Anne", "Rice")).await.unwrap();

    let (authors, total) = repo.authors.list(10, 0).await.unwrap();
    assert_eq!(total, 3);
    let names: Vec<String> = authors.iter().map(|a| a.display_name()).collect();
    assert_eq!(names, vec!["Anne, Rice", "Anne, Tyler", "Zadie, Smith"]);

    let (page, total) = repo.authors.list(1, 1).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(page[0].display_name(), "Anne, Tyler");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_dashboard_counts(pool: PgPool) {
    let repo = Repository::new(pool);
    let catalog = CatalogService::new(repo.clone());

    let author = repo.authors.create(&author_data("Big", "Bob")).await.unwrap();
    let book = seed_book(&repo, "Book Title", "ABCDEFG", Some(author.id)).await;
    seed_copy(&repo, book, LoanStatus::Available).await;
    seed_copy(&repo, book, LoanStatus::Available).await;
    seed_copy(&repo, book, LoanStatus::Maintenance).await;
    repo.genres
        .create_genre(&CreateGenre {
            name: "Fantasy".to_string(),
        })
        .await
        .unwrap();

    let counts = catalog.counts().await.unwrap();
    assert_eq!(counts.num_books, 1);
    assert_eq!(counts.num_instances, 3);
    assert_eq!(counts.num_instances_available, 2);
    assert_eq!(counts.num_authors, 1);
    assert_eq!(counts.num_genres, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_book_details_include_copies_and_labels(pool: PgPool) {
    let repo = Repository::new(pool);
    let catalog = CatalogService::new(repo.clone());

    let author = repo.authors.create(&author_data("Big", "Bob")).await.unwrap();
    let genre = repo
        .genres
        .create_genre(&CreateGenre {
            name: "Fantasy".to_string(),
        })
        .await
        .unwrap();
    let language = repo
        .genres
        .create_language(&CreateLanguage {
            name: "English".to_string(),
        })
        .await
        .unwrap();
    let book = repo
        .books
        .create(&CreateBook {
            title: "Book Title".to_string(),
            summary: "My book summary".to_string(),
            isbn: "ABCDEFG".to_string(),
            author_id: Some(author.id),
            genre_ids: vec![genre.id],
            language_ids: vec![language.id],
        })
        .await
        .unwrap();
    seed_copy(&repo, book.id, LoanStatus::Available).await;

    let details = catalog.get_book(book.id).await.unwrap();
    assert_eq!(details.display_genre, "Fantasy");
    assert_eq!(details.display_language, "English");
    assert_eq!(details.copies.len(), 1);
    assert_eq!(details.author.map(|a| a.name), Some("Big, Bob".to_string()));
    assert_eq!(details.url, format!("/catalog/books/{}", book.id));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_renew_refuses_copy_not_on_loan(pool: PgPool) {
    let repo = Repository::new(pool);
    let loans = LoansService::new(repo.clone());

    let book = seed_book(&repo, "Book Title", "ABCDEFG", None).await;
    let copy = seed_copy(&repo, book, LoanStatus::Available).await;

    let outcome = loans
        .renew(copy, &renew_form(today() + Days::new(7)), today())
        .await
        .unwrap();
    match outcome {
        RenewalOutcome::Rejected { errors, .. } => {
            assert!(errors.get("renewal_date").is_some());
        }
        RenewalOutcome::Renewed(_) => panic!("a copy on the shelf has no loan to renew"),
    }

    let stored = repo.book_instances.get_by_id(copy).await.unwrap();
    assert_eq!(stored.due_back, None);
    assert_eq!(stored.status, LoanStatus::Available);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_invalid_records_are_not_stored(pool: PgPool) {
    let repo = Repository::new(pool);

    let result = repo
        .books
        .create(&CreateBook {
            title: String::new(),
            summary: String::new(),
            isbn: "12345678901234".to_string(),
            author_id: None,
            genre_ids: vec![],
            language_ids: vec![],
        })
        .await;
    match result {
        Err(AppError::Form(fields)) => {
            assert!(fields.get("title").is_some());
            assert!(fields.get("isbn").is_some());
        }
        other => panic!("unexpected {:?}", other.map(|b| b.id)),
    }
    assert_eq!(repo.books.count().await.unwrap(), 0);

    let genre = repo
        .genres
        .create_genre(&CreateGenre {
            name: String::new(),
        })
        .await;
    assert!(matches!(genre, Err(AppError::Form(_))));

    let language = repo
        .genres
        .create_language(&CreateLanguage {
            name: "x".repeat(101),
        })
        .await;
    assert!(matches!(language, Err(AppError::Form(_))));
    assert_eq!(repo.genres.count_genres().await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_authors_with_same_name_page_in_id_order(pool: PgPool) {
    let repo = Repository::new(pool);

    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(repo.authors.create(&author_data("John", "Smith")).await.unwrap().id);
    }

    let mut paged = Vec::new();
    for offset in 0..3 {
        let (page, _) = repo.authors.list(1, offset).await.unwrap();
        paged.push(page[0].id);
    }
    assert_eq!(paged, ids);
}
