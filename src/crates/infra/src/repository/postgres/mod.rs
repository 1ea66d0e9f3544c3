//! sea-orm 实现。生产环境使用 Postgres，测试使用内存 SQLite，查询均通过 sea-orm 构建。
pub mod artist;
pub mod db_data;
pub mod schema;
