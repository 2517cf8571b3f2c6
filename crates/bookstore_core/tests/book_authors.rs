use bookstore_core::db::open_db_in_memory;
use bookstore_core::{
    AssociationError, Author, AuthorId, Book, BookAuthorService, BookId, BookRepository,
    ErrorKind, NewBook, RepoError, RepoResult, SqliteAuthorRepository, SqliteBookRepository,
    TransactionManager, UnitOfWork,
};
use rusqlite::Connection;

const BOOK: BookId = 1;
const BORGES: AuthorId = 10;
const CORTAZAR: AuthorId = 99;
const BIOY: AuthorId = 11;

fn seeded_catalog() -> Connection {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO books (id, name, isbn) VALUES (1, 'Ficciones', '9780802130303');
         INSERT INTO books (id, name, isbn) VALUES (2, 'Rayuela', '9788437604572');
         INSERT INTO authors (id, name) VALUES (10, 'Jorge Luis Borges');
         INSERT INTO authors (id, name) VALUES (11, 'Adolfo Bioy Casares');
         INSERT INTO authors (id, name) VALUES (99, 'Julio Cortázar');",
    )
    .unwrap();
    conn
}

fn link_count(conn: &Connection, book_id: BookId) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM book_authors WHERE book_id = ?1;",
        [book_id],
        |row| row.get(0),
    )
    .unwrap()
}

fn ids(authors: &[Author]) -> Vec<AuthorId> {
    authors.iter().map(|author| author.id).collect()
}

#[test]
fn add_author_returns_author_and_lists_it_on_the_book() {
    let mut conn = seeded_catalog();
    let mut service = BookAuthorService::with_sqlite(&mut conn);

    let added = service.add_author(BOOK, BORGES).unwrap();
    assert_eq!(added.id, BORGES);
    assert_eq!(added.name, "Jorge Luis Borges");

    let authors = service.get_authors(BOOK).unwrap();
    assert_eq!(ids(&authors), vec![BORGES]);
}

#[test]
fn add_author_twice_keeps_a_single_link() {
    let mut conn = seeded_catalog();
    {
        let mut service = BookAuthorService::with_sqlite(&mut conn);
        service.add_author(BOOK, BORGES).unwrap();
        service.add_author(BOOK, BORGES).unwrap();
        assert_eq!(service.get_authors(BOOK).unwrap().len(), 1);
    }
    assert_eq!(link_count(&conn, BOOK), 1);
}

#[test]
fn add_author_checks_author_before_book() {
    let mut conn = seeded_catalog();
    let mut service = BookAuthorService::with_sqlite(&mut conn);

    let err = service.add_author(404, 4040).unwrap_err();
    assert!(matches!(err, AssociationError::AuthorNotFound(4040)));

    let err = service.add_author(404, BORGES).unwrap_err();
    assert!(matches!(err, AssociationError::BookNotFound(404)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn get_authors_follows_link_order() {
    let mut conn = seeded_catalog();
    let mut service = BookAuthorService::with_sqlite(&mut conn);
    service.add_author(BOOK, CORTAZAR).unwrap();
    service.add_author(BOOK, BORGES).unwrap();
    service.add_author(BOOK, BIOY).unwrap();

    let authors = service.get_authors(BOOK).unwrap();
    assert_eq!(ids(&authors), vec![CORTAZAR, BORGES, BIOY]);
}

#[test]
fn get_authors_fails_for_missing_book() {
    let mut conn = seeded_catalog();
    let mut service = BookAuthorService::with_sqlite(&mut conn);

    let err = service.get_authors(404).unwrap_err();
    assert!(matches!(err, AssociationError::BookNotFound(404)));
}

#[test]
fn get_author_returns_linked_author() {
    let mut conn = seeded_catalog();
    let mut service = BookAuthorService::with_sqlite(&mut conn);
    service.add_author(BOOK, BORGES).unwrap();

    let author = service.get_author(BOOK, BORGES).unwrap();
    assert_eq!(author.id, BORGES);
}

#[test]
fn get_author_rejects_existing_but_unlinked_author() {
    let mut conn = seeded_catalog();
    let mut service = BookAuthorService::with_sqlite(&mut conn);
    service.add_author(BOOK, BORGES).unwrap();

    let err = service.get_author(BOOK, CORTAZAR).unwrap_err();
    assert!(matches!(
        err,
        AssociationError::AuthorNotInBook {
            book_id: BOOK,
            author_id: CORTAZAR
        }
    ));
    assert_eq!(err.kind(), ErrorKind::IllegalOperation);
}

#[test]
fn get_author_reports_missing_records_as_not_found() {
    let mut conn = seeded_catalog();
    let mut service = BookAuthorService::with_sqlite(&mut conn);

    assert!(matches!(
        service.get_author(BOOK, 4040).unwrap_err(),
        AssociationError::AuthorNotFound(4040)
    ));
    assert!(matches!(
        service.get_author(404, BORGES).unwrap_err(),
        AssociationError::BookNotFound(404)
    ));
}

#[test]
fn add_authors_is_idempotent_per_element() {
    let mut conn = seeded_catalog();
    let mut service = BookAuthorService::with_sqlite(&mut conn);
    service.add_author(BOOK, BORGES).unwrap();

    let first = service.add_authors(BOOK, &[BORGES, BIOY]).unwrap();
    assert_eq!(ids(&first), vec![BORGES, BIOY]);

    let second = service.add_authors(BOOK, &[BORGES, BIOY, BIOY]).unwrap();
    assert_eq!(second.len(), first.len());
    assert_eq!(ids(&second), ids(&first));
}

#[test]
fn add_authors_with_missing_author_links_nothing() {
    let mut conn = seeded_catalog();
    {
        let mut service = BookAuthorService::with_sqlite(&mut conn);
        let err = service.add_authors(BOOK, &[BORGES, 4040, BIOY]).unwrap_err();
        assert!(matches!(err, AssociationError::AuthorNotFound(4040)));
    }
    assert_eq!(link_count(&conn, BOOK), 0);
}

#[test]
fn add_authors_checks_book_first() {
    let mut conn = seeded_catalog();
    let mut service = BookAuthorService::with_sqlite(&mut conn);

    let err = service.add_authors(404, &[4040]).unwrap_err();
    assert!(matches!(err, AssociationError::BookNotFound(404)));
}

#[test]
fn remove_author_unlinks_only_that_author() {
    let mut conn = seeded_catalog();
    let mut service = BookAuthorService::with_sqlite(&mut conn);
    service.add_authors(BOOK, &[BORGES, BIOY]).unwrap();

    service.remove_author(BOOK, BORGES).unwrap();

    assert_eq!(ids(&service.get_authors(BOOK).unwrap()), vec![BIOY]);
    assert!(matches!(
        service.get_author(BOOK, BORGES).unwrap_err(),
        AssociationError::AuthorNotInBook { .. }
    ));
}

#[test]
fn remove_author_never_linked_is_a_no_op() {
    let mut conn = seeded_catalog();
    let mut service = BookAuthorService::with_sqlite(&mut conn);
    service.add_author(BOOK, BORGES).unwrap();

    service.remove_author(BOOK, CORTAZAR).unwrap();

    assert_eq!(ids(&service.get_authors(BOOK).unwrap()), vec![BORGES]);
}

#[test]
fn remove_author_fails_for_missing_records() {
    let mut conn = seeded_catalog();
    let mut service = BookAuthorService::with_sqlite(&mut conn);

    assert!(matches!(
        service.remove_author(404, 4040).unwrap_err(),
        AssociationError::AuthorNotFound(4040)
    ));
    assert!(matches!(
        service.remove_author(404, BORGES).unwrap_err(),
        AssociationError::BookNotFound(404)
    ));
}

#[test]
fn replace_authors_sets_exact_collection() {
    let mut conn = seeded_catalog();
    let mut service = BookAuthorService::with_sqlite(&mut conn);
    service.add_authors(BOOK, &[BORGES, CORTAZAR]).unwrap();

    let replaced = service.replace_authors(BOOK, &[BIOY, BORGES, BIOY]).unwrap();
    assert_eq!(ids(&replaced), vec![BIOY, BORGES]);
}

#[test]
fn replace_authors_with_missing_author_keeps_previous_collection() {
    let mut conn = seeded_catalog();
    let mut service = BookAuthorService::with_sqlite(&mut conn);
    service.add_authors(BOOK, &[BORGES, CORTAZAR]).unwrap();

    let err = service.replace_authors(BOOK, &[BIOY, 4040]).unwrap_err();
    assert!(matches!(err, AssociationError::AuthorNotFound(4040)));
    assert_eq!(
        ids(&service.get_authors(BOOK).unwrap()),
        vec![BORGES, CORTAZAR]
    );
}

#[test]
fn replace_authors_with_empty_list_clears_collection() {
    let mut conn = seeded_catalog();
    let mut service = BookAuthorService::with_sqlite(&mut conn);
    service.add_authors(BOOK, &[BORGES, CORTAZAR]).unwrap();

    assert!(service.replace_authors(BOOK, &[]).unwrap().is_empty());
}

#[test]
fn links_are_scoped_to_their_book() {
    let mut conn = seeded_catalog();
    let mut service = BookAuthorService::with_sqlite(&mut conn);
    service.add_author(BOOK, BORGES).unwrap();
    service.add_author(2, CORTAZAR).unwrap();

    assert_eq!(ids(&service.get_authors(BOOK).unwrap()), vec![BORGES]);
    assert_eq!(ids(&service.get_authors(2).unwrap()), vec![CORTAZAR]);
}

/// Book store whose author listing always fails, to observe rollback of
/// writes made earlier in the same call.
struct BrokenListingBookRepository(SqliteBookRepository);

impl BookRepository for BrokenListingBookRepository {
    fn create_book(&self, uow: &UnitOfWork<'_>, draft: &NewBook) -> RepoResult<BookId> {
        self.0.create_book(uow, draft)
    }

    fn find_by_id(&self, uow: &UnitOfWork<'_>, id: BookId) -> RepoResult<Option<Book>> {
        self.0.find_by_id(uow, id)
    }

    fn list_books(&self, uow: &UnitOfWork<'_>) -> RepoResult<Vec<Book>> {
        self.0.list_books(uow)
    }

    fn list_authors(&self, _uow: &UnitOfWork<'_>, _book_id: BookId) -> RepoResult<Vec<Author>> {
        Err(RepoError::InvalidData("listing disabled".to_string()))
    }

    fn contains_author(
        &self,
        uow: &UnitOfWork<'_>,
        book_id: BookId,
        author_id: AuthorId,
    ) -> RepoResult<bool> {
        self.0.contains_author(uow, book_id, author_id)
    }

    fn insert_author(
        &self,
        uow: &UnitOfWork<'_>,
        book_id: BookId,
        author_id: AuthorId,
    ) -> RepoResult<bool> {
        self.0.insert_author(uow, book_id, author_id)
    }

    fn remove_author(
        &self,
        uow: &UnitOfWork<'_>,
        book_id: BookId,
        author_id: AuthorId,
    ) -> RepoResult<bool> {
        self.0.remove_author(uow, book_id, author_id)
    }

    fn clear_authors(&self, uow: &UnitOfWork<'_>, book_id: BookId) -> RepoResult<usize> {
        self.0.clear_authors(uow, book_id)
    }
}

#[test]
fn storage_failure_after_writes_rolls_back_the_call() {
    let mut conn = seeded_catalog();
    {
        let mut service = BookAuthorService::new(
            TransactionManager::new(&mut conn),
            SqliteAuthorRepository::new(),
            BrokenListingBookRepository(SqliteBookRepository::new()),
        );
        let err = service.add_authors(BOOK, &[BORGES, BIOY]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
    }
    assert_eq!(link_count(&conn, BOOK), 0);
}
