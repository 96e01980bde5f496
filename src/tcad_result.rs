use crate::TcadError;

pub type TcadResult<T> = Result<T, TcadError>;
