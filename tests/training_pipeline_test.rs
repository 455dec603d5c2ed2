mod common;

use common::{train_fixture, training_config};
use tempfile::TempDir;
use titanic_predictor::adapters::read_dataset;
use titanic_predictor::core::artifact::ModelArtifact;
use titanic_predictor::domain::model::{PassengerRecord, Port, Sex, FEATURE_NAMES};
use titanic_predictor::{LocalStorage, Predictor, PredictorError, TrainingEngine, TrainingPipeline};

#[tokio::test]
async fn test_training_writes_loadable_artifact() {
    let temp_dir = TempDir::new().unwrap();

    let report = train_fixture(temp_dir.path(), 42).await;
    assert_eq!(report.artifact_path, "models/titanic_model.json");
    assert_eq!(report.rows, 50);
    assert!(report.training_accuracy > 0.8);
    assert!(report.oob_accuracy.is_some());

    let bytes = std::fs::read(temp_dir.path().join(&report.artifact_path)).unwrap();
    let artifact = ModelArtifact::from_json_slice("artifact", &bytes).unwrap();
    assert_eq!(artifact.forest.n_trees(), 100);
    assert_eq!(artifact.forest.params.random_seed, 42);
    assert_eq!(artifact.feature_names, FEATURE_NAMES);
    assert_eq!(
        artifact.training_summary.dropped_columns,
        vec!["PassengerId", "Name", "Ticket", "Cabin"]
    );
}

#[tokio::test]
async fn test_fill_values_come_from_training_data() {
    let temp_dir = TempDir::new().unwrap();
    let predictor = common::trained_predictor(temp_dir.path()).await;

    let fill = predictor.artifact().fill_values;
    assert!((fill.age_median - 30.0).abs() < 1e-9);
    assert!((fill.fare_median - 19.5375).abs() < 1e-9);
    assert_eq!(fill.embarked_mode, Port::Southampton);

    // 缺值的乘客與以中位數補齊的乘客應得到相同結果
    let missing = PassengerRecord {
        pclass: 3,
        sex: Sex::Male,
        age: None,
        sib_sp: 0,
        parch: 0,
        fare: None,
        embarked: None,
    };
    let filled = PassengerRecord {
        age: Some(fill.age_median),
        fare: Some(fill.fare_median),
        embarked: Some(Port::Southampton),
        ..missing.clone()
    };
    assert_eq!(
        predictor.predict_record(&missing).unwrap(),
        predictor.predict_record(&filled).unwrap()
    );
}

#[tokio::test]
async fn test_unbootstrapped_forest_reproduces_training_labels() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path());

    // 不抽樣時每棵樹都長到純葉，訓練列的標籤必須原樣回來
    let mut config = training_config(common::FIXTURE, 42);
    config.forest.bootstrap = false;
    let report = TrainingEngine::new(TrainingPipeline::new(storage.clone(), config))
        .run()
        .await
        .unwrap();
    assert_eq!(report.training_accuracy, 1.0);
    assert!(report.oob_accuracy.is_none());

    let predictor = Predictor::load(&storage, &report.artifact_path).await.unwrap();
    let dataset = read_dataset(&std::fs::read(common::FIXTURE).unwrap()).unwrap();
    assert_eq!(dataset.len(), 50);

    for (i, record) in dataset.records.iter().enumerate() {
        let result = predictor.predict_record(&record.passenger).unwrap();
        assert_eq!(result.survived, record.survived, "row {}", i + 1);
        let expected = if record.survived { 1.0 } else { 0.0 };
        assert_eq!(result.probability, expected, "row {}", i + 1);
    }
}

#[tokio::test]
async fn test_same_seed_yields_identical_forest() {
    let first_dir = TempDir::new().unwrap();
    let second_dir = TempDir::new().unwrap();

    let first = train_fixture(first_dir.path(), 42).await;
    let second = train_fixture(second_dir.path(), 42).await;

    let load = |dir: &TempDir, path: &str| {
        let bytes = std::fs::read(dir.path().join(path)).unwrap();
        ModelArtifact::from_json_slice(path, &bytes).unwrap()
    };
    let a = load(&first_dir, &first.artifact_path);
    let b = load(&second_dir, &second.artifact_path);

    assert_eq!(a.forest, b.forest);
    assert_eq!(
        serde_json::to_vec(&a.forest).unwrap(),
        serde_json::to_vec(&b.forest).unwrap()
    );
    assert_eq!(a.fill_values, b.fill_values);
}

#[tokio::test]
async fn test_retraining_overwrites_artifact() {
    let temp_dir = TempDir::new().unwrap();

    train_fixture(temp_dir.path(), 1).await;
    let report = train_fixture(temp_dir.path(), 2).await;

    let predictor = Predictor::load(&LocalStorage::new(temp_dir.path()), &report.artifact_path)
        .await
        .unwrap();
    assert_eq!(predictor.artifact().forest.params.random_seed, 2);
}

#[tokio::test]
async fn test_missing_column_fails_training() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("no_fare.csv"),
        "Survived,Pclass,Sex,Age,SibSp,Parch,Embarked\n1,1,female,30,0,0,S\n",
    )
    .unwrap();

    let pipeline = TrainingPipeline::new(
        LocalStorage::new(temp_dir.path()),
        training_config("no_fare.csv", 42),
    );
    let err = TrainingEngine::new(pipeline).run().await.unwrap_err();

    assert!(matches!(err, PredictorError::MissingColumn { ref column } if column == "Fare"));
    assert!(!temp_dir.path().join("models/titanic_model.json").exists());
}

#[tokio::test]
async fn test_missing_dataset_is_system_error() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = TrainingPipeline::new(
        LocalStorage::new(temp_dir.path()),
        training_config("absent.csv", 42),
    );

    let err = TrainingEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(err, PredictorError::Io(_)));
    assert_eq!(err.exit_code(), 3);
}
