//! GraphQL documents sent to the remote API.
//!
//! These strings are a fixed external contract shared with the server schema.

pub const SIGN_IN: &str = "
mutation SignIn($username: String!, $password: String!) {
  signIn(username: $username, password: $password)
}";

pub const SIGN_UP: &str = "
mutation SignUp($username: String!, $password: String!) {
  signUp(username: $username, password: $password)
}";

pub const CREATE_TODO_LIST: &str = "
mutation createTodoLists($input: [TodoListCreateInput!]!) {
  createTodoLists(input: $input) {
    todoLists {
      id
      owner {
        username
      }
      title
    }
  }
}";

pub const TODO_LISTS: &str = "
query TodoLists($where: TodoListWhere) {
  todoLists(where: $where) {
    id
    title
  }
}";

pub const DELETE_TODO_LIST: &str = "
mutation DeleteTodoLists($where: TodoListWhere) {
  deleteTodoLists(where: $where) {
    nodesDeleted
  }
}";

pub const CREATE_TODO: &str = "
mutation CreateTodos($input: [TodoCreateInput!]!) {
  createTodos(input: $input) {
    todos {
      id
      content
      done
    }
  }
}";

pub const TODOS: &str = "
query Todos($where: TodoWhere) {
  todos(where: $where) {
    id
    content
    done
  }
}";

pub const DELETE_TODO: &str = "
mutation DeleteTodos($where: TodoWhere) {
  deleteTodos(where: $where) {
    nodesDeleted
  }
}";

pub const UPDATE_TODO: &str = "
mutation UpdateTodos($where: TodoWhere, $update: TodoUpdateInput) {
  updateTodos(where: $where, update: $update) {
    todos {
      id
      content
      done
    }
  }
}";
