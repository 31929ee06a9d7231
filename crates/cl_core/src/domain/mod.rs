// 도메인 타입: 시즌, 증강 플래그, 학습 모드, 지표 레코드

pub mod augmentation;
pub mod metric;
pub mod season;

pub use augmentation::*;
pub use metric::*;
pub use season::*;
