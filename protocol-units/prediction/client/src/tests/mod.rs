mod prediction_flow;
