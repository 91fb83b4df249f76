//! DDL rendering through each dialect's templates.

use insta::assert_snapshot;
use sqlweave::ddl::{ColumnDef, CreateTable, DdlStatement, ForeignKey, IndexDef, ReferentialAction};
use sqlweave::dialect::{MySql, Postgres, SqlDialect, Sqlite, TSql};
use sqlweave::types::DataType;
use sqlweave::{raw, CompileError};

fn users_table() -> CreateTable {
    CreateTable::new("users")
        .column(
            ColumnDef::new("id", DataType::Int64)
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .column(ColumnDef::new("email", DataType::Varchar(255)).not_null().unique())
        .column(ColumnDef::new("active", DataType::Bool).default_value(true))
}

#[test]
fn test_create_table_mysql() {
    assert_snapshot!(
        MySql.create_table(&users_table()).unwrap(),
        @"CREATE TABLE `users` (`id` BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY, `email` VARCHAR(255) NOT NULL UNIQUE, `active` TINYINT(1) DEFAULT 1)"
    );
}

#[test]
fn test_create_table_sqlite_identity_follows_key() {
    assert_snapshot!(
        Sqlite.create_table(&users_table()).unwrap(),
        @r#"CREATE TABLE "users" ("id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT, "email" TEXT NOT NULL UNIQUE, "active" INTEGER DEFAULT 1)"#
    );
}

#[test]
fn test_create_table_tsql() {
    assert_snapshot!(
        TSql.create_table(&users_table()).unwrap(),
        @"CREATE TABLE [users] ([id] BIGINT NOT NULL IDENTITY(1, 1) PRIMARY KEY, [email] NVARCHAR(255) NOT NULL UNIQUE, [active] BIT DEFAULT 1)"
    );
    assert!(matches!(
        TSql.create_table(&users_table().if_not_exists()),
        Err(CompileError::UnsupportedOperation { .. })
    ));
}

#[test]
fn test_create_table_with_composite_key_and_foreign_key() {
    let table = CreateTable::new("memberships")
        .if_not_exists()
        .column(ColumnDef::new("user_id", DataType::Int64).not_null())
        .column(ColumnDef::new("team_id", DataType::Int64).not_null())
        .column(ColumnDef::new("joined_at", DataType::Timestamp).default_raw(raw("CURRENT_TIMESTAMP")))
        .primary_key(["user_id", "team_id"])
        .foreign_key(
            ForeignKey::new("fk_member_user", ["user_id"], "users", ["id"])
                .on_delete(ReferentialAction::Cascade),
        );

    assert_snapshot!(
        Postgres.create_table(&table).unwrap(),
        @r#"CREATE TABLE IF NOT EXISTS "memberships" ("user_id" BIGINT NOT NULL, "team_id" BIGINT NOT NULL, "joined_at" TIMESTAMP DEFAULT CURRENT_TIMESTAMP, PRIMARY KEY ("user_id", "team_id"), CONSTRAINT "fk_member_user" FOREIGN KEY ("user_id") REFERENCES "users" ("id") ON DELETE CASCADE)"#
    );
}

#[test]
fn test_create_table_requires_columns() {
    assert!(matches!(
        Postgres.create_table(&CreateTable::new("empty")),
        Err(CompileError::EmptyFragment { .. })
    ));
}

#[test]
fn test_renames_per_dialect() {
    assert_eq!(
        MySql.rename_table("a", "b").unwrap(),
        "RENAME TABLE `a` TO `b`"
    );
    assert_eq!(
        Postgres.rename_table("a", "b").unwrap(),
        r#"ALTER TABLE "a" RENAME TO "b""#
    );
    assert_eq!(
        TSql.rename_table("a", "b").unwrap(),
        "EXEC sp_rename 'a', 'b'"
    );
    assert_eq!(
        TSql.rename_column("users", "mail", "email").unwrap(),
        "EXEC sp_rename 'users.mail', 'email', 'COLUMN'"
    );
    assert_eq!(
        Sqlite.rename_column("users", "mail", "email").unwrap(),
        r#"ALTER TABLE "users" RENAME COLUMN "mail" TO "email""#
    );
}

#[test]
fn test_change_column_per_dialect() {
    let column = ColumnDef::new("email", DataType::Varchar(320)).not_null();

    assert_eq!(
        MySql.change_column("users", &column).unwrap(),
        "ALTER TABLE `users` MODIFY COLUMN `email` VARCHAR(320) NOT NULL"
    );
    assert_eq!(
        Postgres.change_column("users", &column).unwrap(),
        r#"ALTER TABLE "users" ALTER COLUMN "email" TYPE VARCHAR(320), ALTER COLUMN "email" SET NOT NULL"#
    );
    assert_eq!(
        TSql.change_column("users", &column).unwrap(),
        "ALTER TABLE [users] ALTER COLUMN [email] NVARCHAR(320) NOT NULL"
    );
    assert!(matches!(
        Sqlite.change_column("users", &column),
        Err(CompileError::UnsupportedOperation { dialect: "sqlite", .. })
    ));
}

#[test]
fn test_add_and_drop_column() {
    let column = ColumnDef::new("nickname", DataType::Varchar(50)).null();
    assert_eq!(
        Postgres.add_column("users", &column).unwrap(),
        r#"ALTER TABLE "users" ADD COLUMN "nickname" VARCHAR(50) NULL"#
    );
    assert_eq!(
        TSql.add_column("users", &column).unwrap(),
        "ALTER TABLE [users] ADD [nickname] NVARCHAR(50) NULL"
    );
    assert_eq!(
        MySql.drop_column("users", "nickname").unwrap(),
        "ALTER TABLE `users` DROP COLUMN `nickname`"
    );
}

#[test]
fn test_foreign_keys_per_dialect() {
    let fk = ForeignKey::new("fk_post_author", ["author_id"], "users", ["id"])
        .on_update(ReferentialAction::NoAction);

    assert_eq!(
        MySql.add_foreign_key("posts", &fk).unwrap(),
        "ALTER TABLE `posts` ADD CONSTRAINT `fk_post_author` FOREIGN KEY (`author_id`) REFERENCES `users` (`id`) ON UPDATE NO ACTION"
    );
    assert_eq!(
        MySql.drop_foreign_key("posts", "fk_post_author").unwrap(),
        "ALTER TABLE `posts` DROP FOREIGN KEY `fk_post_author`"
    );
    assert_eq!(
        Postgres.drop_foreign_key("posts", "fk_post_author").unwrap(),
        r#"ALTER TABLE "posts" DROP CONSTRAINT "fk_post_author""#
    );
    assert!(Sqlite.add_foreign_key("posts", &fk).is_err());
}

#[test]
fn test_indexes_per_dialect() {
    let index = IndexDef::new("idx_users_email", "users", ["email"]).unique();
    assert_eq!(
        Postgres.create_index(&index).unwrap(),
        r#"CREATE UNIQUE INDEX "idx_users_email" ON "users" ("email")"#
    );
    assert_eq!(
        Postgres.drop_index("users", "idx_users_email").unwrap(),
        r#"DROP INDEX "idx_users_email""#
    );
    assert_eq!(
        MySql.drop_index("users", "idx_users_email").unwrap(),
        "DROP INDEX `idx_users_email` ON `users`"
    );
    assert_eq!(
        TSql.drop_index("users", "idx_users_email").unwrap(),
        "DROP INDEX [idx_users_email] ON [users]"
    );
}

#[test]
fn test_ddl_statement_dispatch() {
    let statements = vec![
        DdlStatement::DropTable {
            name: "old".into(),
            if_exists: true,
        },
        DdlStatement::CreateIndex(IndexDef::new("idx_a", "t", ["a"])),
    ];
    let dialect: &dyn SqlDialect = &Sqlite;
    let sql: Vec<String> = statements
        .iter()
        .map(|stmt| stmt.to_sql(dialect).unwrap())
        .collect();
    assert_eq!(
        sql,
        vec![
            r#"DROP TABLE IF EXISTS "old""#.to_string(),
            r#"CREATE INDEX "idx_a" ON "t" ("a")"#.to_string(),
        ]
    );
}
