mod expense;
mod group;
mod member;
mod settlement;
mod user;

pub use expense::{equal_split, Expense, ExpenseShare, NewExpense, NewShare, SplitType};
pub use group::{Group, GroupType, NewGroup};
pub use member::{Member, NewMember};
pub use settlement::{NewSettlement, Settlement, Transfer};
pub use user::{NewUser, User};
