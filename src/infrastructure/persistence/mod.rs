mod in_memory_task_store;

pub use in_memory_task_store::InMemoryTaskStore;
