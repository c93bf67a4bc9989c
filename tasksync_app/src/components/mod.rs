mod task_form;
mod task_list;

pub use task_form::NewTaskForm;
pub use task_list::TaskList;
